//! Derived file naming.

/// Derives conversion and responsive file names from an original file name.
///
/// `conversion_file_name` must be injective over (file name, conversion name)
/// so that two conversions of the same media can never collide on disk.
pub trait FileNamer: Send + Sync {
    /// The original file name with its extension stripped.
    fn original_file_name(&self, file_name: &str) -> String;

    /// Stem of a conversion artifact, extension excluded.
    fn conversion_file_name(&self, file_name: &str, conversion_name: &str) -> String;

    /// Stem shared by a responsive variant family, extension excluded.
    fn responsive_file_name(&self, file_name: &str) -> String;

    /// Name of one responsive variant at a given width.
    fn responsive_variant_name(
        &self,
        file_name: &str,
        conversion_name: &str,
        width: u32,
        extension: &str,
    ) -> String {
        format!(
            "{}___{}_{}.{}",
            self.responsive_file_name(file_name),
            conversion_name,
            width,
            extension
        )
    }

    /// Extension of a derived file path.
    fn extension_from_base_image(&self, path: &str) -> String {
        path.rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default()
    }
}

/// Stem plus `-{conversion}` naming.
///
/// # Examples
///
/// ```
/// use medley_core::{DefaultFileNamer, FileNamer};
///
/// let namer = DefaultFileNamer;
/// assert_eq!(namer.conversion_file_name("photo.png", "thumb"), "photo-thumb");
/// assert_eq!(namer.responsive_file_name("photo.png"), "photo");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFileNamer;

impl FileNamer for DefaultFileNamer {
    fn original_file_name(&self, file_name: &str) -> String {
        stem_of(file_name).to_string()
    }

    fn conversion_file_name(&self, file_name: &str, conversion_name: &str) -> String {
        format!("{}-{}", stem_of(file_name), conversion_name)
    }

    fn responsive_file_name(&self, file_name: &str) -> String {
        stem_of(file_name).to_string()
    }
}

fn stem_of(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_names_are_distinct_per_conversion() {
        let namer = DefaultFileNamer;
        let a = namer.conversion_file_name("photo.png", "thumb");
        let b = namer.conversion_file_name("photo.png", "preview");
        assert_ne!(a, b);
    }

    #[test]
    fn stem_keeps_inner_dots() {
        let namer = DefaultFileNamer;
        assert_eq!(namer.original_file_name("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn responsive_variant_name_carries_width() {
        let namer = DefaultFileNamer;
        assert_eq!(
            namer.responsive_variant_name("photo.png", "thumb", 640, "png"),
            "photo___thumb_640.png"
        );
    }
}
