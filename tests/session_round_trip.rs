//! End-to-end editing scenarios through `EditorSession`, export and import.

use pixel_pattern::grid::Edge;
use pixel_pattern::persist::{self, FileStore, StateStore};
use pixel_pattern::types::Rgb;
use pixel_pattern::{EditorSession, ImportError, ValidationError};

fn paint(session: &mut EditorSession, cells: &[(usize, usize)]) {
    let (r0, c0) = cells[0];
    session.begin_stroke(r0, c0);
    for &(r, c) in cells {
        session.continue_stroke(r, c, false);
    }
    session.end_stroke();
}

#[test]
fn edited_pattern_survives_export_and_import() {
    let mut session = EditorSession::new();
    session.add_color(Rgb::new(0xE6, 0x39, 0x46)).unwrap();
    session.set_active_color(2).unwrap();
    paint(&mut session, &[(0, 0), (0, 1), (1, 1)]);
    session.resize_edge(Edge::Left, 2).unwrap();
    session.set_background_color(Rgb::new(0xFA, 0xFA, 0xF0));
    session.set_aspect_ratio(1.5);
    session.set_preview_repeat(4, 2);
    assert!(session.set_active_palette("pastel"));

    let doc = session.to_document();
    let json = persist::export_json(&doc, "2026-01-01T00:00:00Z").unwrap();
    let back = persist::import_json(&json).unwrap();
    assert_eq!(back, doc);

    let reopened = EditorSession::from_document(back);
    assert_eq!(reopened.grid().get(0, 2), Some(2));
    assert_eq!(reopened.grid().width(), 18);
    assert_eq!(reopened.preview_repeat(), (4, 2));
    assert_eq!(reopened.active_palette(), "pastel");
    assert!(!reopened.can_undo());
}

#[test]
fn undo_walks_back_through_every_kind_of_edit() {
    let mut session = EditorSession::new();
    let start = session.snapshot();

    paint(&mut session, &[(5, 5)]);
    session.resize_centered(20, 20).unwrap();
    session.add_color(Rgb::WHITE).unwrap();
    session.clear();

    let mut steps = 0;
    while session.undo() {
        steps += 1;
    }
    assert_eq!(steps, 4);
    assert_eq!(session.snapshot(), start);

    while session.redo() {}
    assert!(session.grid().is_blank());
    assert_eq!(session.grid().width(), 20);
    assert_eq!(session.pattern_colors().len(), 2);
}

#[test]
fn structural_errors_are_rejected_on_import() {
    let wrong_version = r##"{"version":2,"grid":{"width":2,"height":2,"cells":[[0,0],[0,0]]},
        "colors":{"background":"#FFFFFF","pattern":["#000000"]}}"##;
    assert!(matches!(
        persist::import_json(wrong_version),
        Err(ImportError::Invalid(ValidationError::UnsupportedVersion))
    ));
    assert!(matches!(
        persist::import_json("{not json"),
        Err(ImportError::Malformed(_))
    ));
}

#[test]
fn file_store_autosaves_the_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("state").join("autosave.json");

    let mut session = EditorSession::new().with_store(Box::new(FileStore::new(&path)));
    paint(&mut session, &[(3, 4)]);
    drop(session);

    let restored = FileStore::new(&path).load()?.expect("autosave was written");
    assert_eq!(restored.grid.get(3, 4), Some(1));
    Ok(())
}
