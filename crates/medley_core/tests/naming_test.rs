//! Tests for path generation and file naming.

use medley_core::{
    Conversion, DefaultFileNamer, DefaultPathGenerator, FileNamer, Manipulation, MediaItem,
    PathGenerator,
};

#[test]
fn paths_derive_from_id_only() {
    let paths = DefaultPathGenerator::default();
    let a = MediaItem::new(42u64, "photo.png", "local");
    let mut b = a.clone();
    b.rename("other-name.jpg");

    // Renaming the file never changes the directories.
    assert_eq!(paths.path(&a), paths.path(&b));
    assert_eq!(paths.path_for_conversions(&a), paths.path_for_conversions(&b));
    assert_eq!(
        paths.path_for_responsive_images(&a),
        paths.path_for_responsive_images(&b)
    );
}

#[test]
fn default_layout() {
    let paths = DefaultPathGenerator::default();
    let media = MediaItem::new(1u64, "photo.png", "local");

    assert_eq!(paths.path(&media), "media/1/");
    assert_eq!(paths.path_for_conversions(&media), "media/1/conversions/");
    assert_eq!(
        paths.path_for_responsive_images(&media),
        "media/1/responsive-images/"
    );
}

#[test]
fn custom_prefix() {
    let paths = DefaultPathGenerator::new("uploads");
    let media = MediaItem::new("abc", "photo.png", "local");

    assert_eq!(paths.path(&media), "uploads/abc/");
}

#[test]
fn conversion_file_name_is_injective_across_conversions() {
    let namer = DefaultFileNamer;
    let names = ["thumb", "preview", "thumb-2", "hero"];

    let mut outputs: Vec<String> = names
        .iter()
        .map(|name| namer.conversion_file_name("photo.png", name))
        .collect();
    outputs.sort();
    outputs.dedup();

    assert_eq!(outputs.len(), names.len());
}

#[test]
fn namer_strips_only_last_extension() {
    let namer = DefaultFileNamer;

    assert_eq!(namer.original_file_name("photo.png"), "photo");
    assert_eq!(namer.original_file_name("backup.tar.gz"), "backup.tar");
    assert_eq!(namer.original_file_name("no-extension"), "no-extension");
}

#[test]
fn requested_format_takes_last_format_step() {
    let conversion = Conversion::new("web")
        .add(Manipulation::Format("webp".to_string()))
        .add(Manipulation::Width(800))
        .add(Manipulation::Format("avif".to_string()));

    assert_eq!(conversion.requested_format(), Some("avif"));

    let plain = Conversion::new("thumb").add(Manipulation::Width(200));
    assert_eq!(plain.requested_format(), None);
}
