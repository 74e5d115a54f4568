use std::fs;

use univerify::app::App;
use univerify::store::Store;
use univerify::{AnyTree, Dictionary, Document, Variant};

fn session(app: &mut App<AnyTree<Document>>, script: &str) -> String {
    let mut out = Vec::new();
    app.run(script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn documents_survive_a_restart() {
    let tmp = tempfile::tempdir().unwrap();

    for variant in Variant::ALL {
        let store = Store::open(tmp.path()).unwrap();
        let mut app = App::new(store, AnyTree::new(variant));
        app.preload();
        session(
            &mut app,
            &format!("3\n{k}\nA{k}\npdf\n4\n{k}\npending\n", k = variant as i64 + 1),
        );
    }

    let store = Store::open(tmp.path()).unwrap();
    let mut app = App::new(store, AnyTree::new(Variant::Bst));

    assert_eq!(app.preload(), 3);
    for key in 1..=3 {
        let doc = app.search_document(key).unwrap();
        assert_eq!(doc.applicant_id, format!("A{key}"));
        assert_eq!(doc.status, "pending");
    }
}

#[test]
fn preload_follows_file_name_order() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        store.save(&Document::new(key, "A", "pdf")).unwrap();
    }

    let mut app = App::new(store, AnyTree::new(Variant::Splay));
    app.preload();

    // Files load as 1, 3, 4, 5, 7, 8, 9 and the splay tree keeps the last
    // insert at its root.
    assert_eq!(app.tree().root().map(|d| d.doc_id), Some(9));
    assert_eq!(app.tree().len(), 7);
}

#[test]
fn malformed_files_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    store.save(&Document::new(1, "A1", "pdf")).unwrap();
    fs::write(tmp.path().join("2.json"), "not json at all").unwrap();
    fs::write(tmp.path().join("notes.md"), "# ignore me").unwrap();

    let mut app = App::new(store, AnyTree::new(Variant::Avl));

    assert_eq!(app.preload(), 1);
    let listing = app.list_documents();
    assert!(listing.contains("| 1      | A1           | pdf  | new    |"), "{listing}");
    assert!(!listing.contains("| 2 "), "{listing}");
}

#[test]
fn menu_drives_every_operation() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    let mut app = App::new(store, AnyTree::new(Variant::Avl));

    let out = session(
        &mut app,
        "3\n7\nA7\ndoc\n3\n7\nB7\npdf\n2\n7\n4\n7\nverified\n5\n7\n5\n7\n6\n",
    );

    assert!(out.contains("Inserted document 7."), "{out}");
    assert!(out.contains("Document 7 already exists."), "{out}");
    assert!(out.contains("Document ID: 7"), "{out}");
    assert!(out.contains("Updated Status to 'verified' for Document 7"), "{out}");
    assert!(out.contains("Deleted Document 7"), "{out}");
    assert!(out.contains("Document not found, cannot delete."), "{out}");
    assert!(app.tree().is_empty());
    assert!(!app.store().path_for(7).exists());
}
