// End-to-end: PNG on disk -> session -> anchors/template -> exported frames.

use std::io::Read;

use image::{Rgba, RgbaImage};
use sprite_splitter::{export, loader, AnchorPreset, Background, Error, Rect, Session};

/// Three "characters" of different heights standing on the same floor (y = 40).
fn write_sheet(dir: &std::path::Path) -> std::path::PathBuf {
    let mut img = RgbaImage::new(120, 48);
    let paint = |img: &mut RgbaImage, r: Rect, c: Rgba<u8>| {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                img.put_pixel(x as u32, y as u32, c);
            }
        }
    };
    paint(&mut img, Rect::new(2, 10, 24, 30), Rgba([255, 0, 0, 255]));
    paint(&mut img, Rect::new(40, 16, 22, 24), Rgba([0, 255, 0, 255]));
    paint(&mut img, Rect::new(80, 4, 26, 36), Rgba([0, 0, 255, 255]));
    paint(&mut img, Rect::new(110, 44, 3, 3), Rgba([9, 9, 9, 255])); // dust
    let path = dir.join("sheet.png");
    img.save(&path).unwrap();
    path
}

#[test]
fn bottom_anchored_template_exports_aligned_frames() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = loader::load_sheet(&write_sheet(dir.path())).unwrap();
    let mut session = Session::new(sheet, Background::Alpha);

    assert_eq!(session.islands().len(), 4);
    assert_eq!(session.sprites().len(), 3); // dust filtered at sensitivity 20

    // scan order is row-major, so the tallest (topmost) one comes first
    assert_eq!(session.sprites()[0].rect, Rect::new(80, 4, 26, 36));

    session.apply_preset(AnchorPreset::Bottom, true);
    session.apply_template_from(0).unwrap();
    for s in session.sprites() {
        assert_eq!((s.rect.w, s.rect.h), (26, 36));
        assert_eq!(s.rect.bottom(), 40);
    }

    let out = dir.path().join("frames");
    let files = export::export_sequence(session.sheet(), session.sprites(), session.sequence(), &out).unwrap();
    assert_eq!(files.len(), 3);
    for (i, f) in files.iter().enumerate() {
        assert_eq!(f.file_name().unwrap().to_str().unwrap(), format!("frame_{i}.png"));
        let frame = image::open(f).unwrap().to_rgba8();
        assert_eq!(frame.dimensions(), (26, 36));
        // every character's feet land on the last row
        assert_eq!(frame.get_pixel(13, 35)[3], 255);
    }
}

#[test]
fn sequence_order_and_repeats_drive_export() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = loader::load_sheet(&write_sheet(dir.path())).unwrap();
    let mut session = Session::new(sheet, Background::Alpha);

    session.push_frame(0).unwrap();
    session.move_frame(3, 0).unwrap();
    assert_eq!(session.sequence().frames(), &[0, 0, 1, 2]);
    session.remove_frame(2).unwrap();

    let out = dir.path().join("seq");
    let files = export::export_sequence(session.sheet(), session.sprites(), session.sequence(), &out).unwrap();
    assert_eq!(files.len(), 3);
    let last = image::open(&files[2]).unwrap().to_rgba8();
    assert_eq!(*last.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
}

#[test]
fn all_sprites_export_uses_detection_order() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = loader::load_sheet(&write_sheet(dir.path())).unwrap();
    let mut session = Session::new(sheet, Background::Alpha);
    session.apply_variation(1);

    let out = dir.path().join("all");
    let files = export::export_sprites(session.sheet(), session.sprites(), &out).unwrap();
    assert_eq!(files.len(), 4);
    assert!(out.join("sprite_3.png").exists());
    let dust = image::open(out.join("sprite_3.png")).unwrap();
    assert_eq!((dust.width(), dust.height()), (3, 3));
}

#[test]
fn rejected_template_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = loader::load_sheet(&write_sheet(dir.path())).unwrap();
    let mut session = Session::new(sheet, Background::Alpha);
    let before = session.sprites().to_vec();

    assert!(matches!(session.apply_template(0, 12), Err(Error::InvalidTargetSize { .. })));
    assert!(matches!(session.apply_template_from(7), Err(Error::IndexOutOfRange { index: 7, len: 3 })));
    assert_eq!(session.sprites(), &before[..]);
}

#[test]
fn zip_archive_holds_one_png_per_sequence_step() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = loader::load_sheet(&write_sheet(dir.path())).unwrap();
    let mut session = Session::new(sheet, Background::Alpha);
    session.push_frame(2).unwrap();

    let path = dir.path().join("out").join("sprites.zip");
    let written = export::export_zip(session.sheet(), session.sprites(), session.sequence(), &path).unwrap();
    assert_eq!(written, path);

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    assert_eq!(names, ["frame_0.png", "frame_1.png", "frame_2.png", "frame_3.png"]);

    // detection order: blue (tallest), red, green, then green again
    let expected = [(26, 36), (24, 30), (22, 24), (22, 24)];
    for (i, want) in expected.into_iter().enumerate() {
        let mut bytes = Vec::new();
        archive.by_name(&format!("frame_{i}.png")).unwrap().read_to_end(&mut bytes).unwrap();
        let frame = image::load_from_memory(&bytes).unwrap();
        assert_eq!((frame.width(), frame.height()), want, "frame_{i}");
    }
}

#[test]
fn missing_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load_sheet(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, Error::ImageDecode(_)));
}
