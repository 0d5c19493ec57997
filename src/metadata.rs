use anyhow::Context;
use id3::{frame::Timestamp, TagLike, Version};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use std::path::Path;

use crate::parser::TrackMetadata;

/// Fixed artist/genre applied to every processed file. Immutable for the
/// whole run; injected into [`TagWriter`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetMetadata {
    pub artist: &'static str,
    pub genre: &'static str,
}

impl Default for PresetMetadata {
    fn default() -> Self {
        Self {
            artist: "Stop'n'Time",
            genre: "Jazz",
        }
    }
}

/// The two tag layouts this tool knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    M4a,
}

impl AudioFormat {
    /// Classify a directory entry by its extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("mp3") {
            Some(AudioFormat::Mp3)
        } else if ext.eq_ignore_ascii_case("m4a") {
            Some(AudioFormat::M4a)
        } else {
            None
        }
    }
}

/// Applies derived metadata plus the preset fields to one audio file.
pub struct TagWriter {
    preset: PresetMetadata,
}

impl TagWriter {
    pub fn new(preset: PresetMetadata) -> Self {
        Self { preset }
    }

    /// Write tags for one file, dispatched by format. Errors cover any
    /// open/parse/save failure; callers downgrade them to a per-file
    /// outcome instead of aborting the batch.
    pub fn write(
        &self,
        path: &Path,
        format: AudioFormat,
        metadata: &TrackMetadata,
    ) -> anyhow::Result<()> {
        match format {
            AudioFormat::Mp3 => self.write_mp3(path, metadata),
            AudioFormat::M4a => self.write_m4a(path, metadata),
        }
    }

    /// Tag an MP3 via ID3v2.4, keeping any frames already on the file.
    fn write_mp3(&self, path: &Path, metadata: &TrackMetadata) -> anyhow::Result<()> {
        let mut tag = match id3::Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(id3::Error {
                kind: id3::ErrorKind::NoTag,
                ..
            }) => id3::Tag::new(),
            Err(e) => {
                return Err(e).context(format!("reading ID3 tag from {}", path.display()))
            }
        };

        if !metadata.title.is_empty() {
            tag.set_title(&metadata.title);
        }
        if !metadata.album.is_empty() {
            tag.set_album(&metadata.album);
        }
        if let Ok(year) = metadata.year.parse::<i32>() {
            // the TDRC recording-date frame, where players expect the year
            tag.set_date_recorded(Timestamp {
                year,
                month: None,
                day: None,
                hour: None,
                minute: None,
                second: None,
            });
        }

        tag.set_artist(self.preset.artist);
        tag.set_genre(self.preset.genre);

        tag.write_to_path(path, Version::Id3v24)
            .context(format!("writing ID3 tag to {}", path.display()))?;

        Ok(())
    }

    /// Tag an M4A through its MP4 ilst atoms.
    fn write_m4a(&self, path: &Path, metadata: &TrackMetadata) -> anyhow::Result<()> {
        let mut tagged_file = Probe::open(path)
            .context(format!("opening {}", path.display()))?
            .read()
            .context(format!("reading tags from {}", path.display()))?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(lofty::tag::Tag::new(tag_type));
        }
        let tag = tagged_file
            .tag_mut(tag_type)
            .with_context(|| format!("no writable tag for {}", path.display()))?;

        if !metadata.title.is_empty() {
            tag.set_title(metadata.title.clone());
        }
        if !metadata.album.is_empty() {
            tag.set_album(metadata.album.clone());
        }
        if let Ok(year) = metadata.year.parse::<u32>() {
            tag.set_year(year);
        }

        tag.set_artist(self.preset.artist.to_string());
        tag.set_genre(self.preset.genre.to_string());

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .context(format!("saving tags to {}", path.display()))?;

        Ok(())
    }
}
