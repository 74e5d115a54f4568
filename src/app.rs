//! The document registry: a tree kept in step with a [`Store`], and the
//! line-oriented menu that drives it.
//!
//! The tree is the source of truth for search, update and delete. The store
//! is written after every successful change; a failed write is logged and
//! the change stays in the tree.

use std::io::{self, BufRead, Write};

use crate::dictionary::Dictionary;
use crate::document::Document;
use crate::record::Key;
use crate::store::Store;

const MENU: &str = "Options: 1. List  2. Search  3. Insert  4. Update  5. Delete  6. Exit";

/// A tree of documents backed by a directory of files.
pub struct App<D> {
    store: Store,
    tree: D,
}

impl<D: Dictionary<Document>> App<D> {
    /// Pairs `tree` with `store`. Nothing is loaded until [`App::preload`].
    pub fn new(store: Store, tree: D) -> Self {
        App { store, tree }
    }

    /// The in-memory tree.
    pub fn tree(&self) -> &D {
        &self.tree
    }

    /// The backing store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Inserts every stored document into the tree, in file-name order.
    /// Returns how many were inserted.
    pub fn preload(&mut self) -> usize {
        let mut inserted = 0;
        for doc in self.store.load_all() {
            let key = doc.doc_id;
            if self.tree.insert(doc) {
                inserted += 1;
            } else {
                log::warn!("document {key} is stored twice, keeping the first copy");
            }
        }
        log::debug!("preloaded {inserted} documents from {}", self.store.dir().display());
        inserted
    }

    /// The stored documents as a table, or a note that there are none.
    pub fn list_documents(&self) -> String {
        let docs = self.store.load_all();
        if docs.is_empty() {
            "No documents found!".to_string()
        } else {
            render_table(&docs)
        }
    }

    /// Looks `key` up in the tree.
    pub fn search_document(&mut self, key: Key) -> Option<&Document> {
        self.tree.search(key)
    }

    /// Adds `doc` to the tree and writes its file. Returns `false`, touching
    /// nothing, if the key is taken.
    pub fn insert_document(&mut self, doc: Document) -> bool {
        let key = doc.doc_id;
        let copy = doc.clone();
        if !self.tree.insert(doc) {
            return false;
        }
        match self.store.save(&copy) {
            Ok(path) => log::info!(action = "Saved"; "document {key} to {}", path.display()),
            Err(e) => log::error!("failed to save document {key}: {e}"),
        }
        true
    }

    /// Sets the status of the document under `key` and rewrites its file.
    pub fn update_document(&mut self, key: Key, status: String) -> Option<&Document> {
        let doc = self.tree.update(key, status)?;
        match self.store.save(doc) {
            Ok(path) => log::info!(action = "Updated"; "file {}", path.display()),
            Err(e) => log::error!("failed to update document {key}: {e}"),
        }
        Some(doc)
    }

    /// Removes the document under `key` from the tree and deletes its file.
    pub fn delete_document(&mut self, key: Key) -> bool {
        if !self.tree.delete(key) {
            return false;
        }
        match self.store.remove(key) {
            Ok(true) => log::info!(action = "Removed"; "file {}", self.store.path_for(key).display()),
            Ok(false) => log::debug!("document {key} had no file"),
            Err(e) => log::error!("failed to remove document {key}: {e}"),
        }
        true
    }

    /// Runs the menu until the user picks "Exit" or `input` runs dry.
    pub fn run<I: BufRead, O: Write>(&mut self, mut input: I, mut output: O) -> io::Result<()> {
        writeln!(output, "\nAvailable documents (from folder):")?;
        writeln!(output, "{}", self.list_documents())?;

        loop {
            writeln!(output, "\n{MENU}")?;
            let Some(choice) = prompt(&mut input, &mut output, "Enter choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => {
                    writeln!(output, "\nAvailable documents (from folder):")?;
                    writeln!(output, "{}", self.list_documents())?;
                }
                "2" => {
                    let Some(line) = prompt(&mut input, &mut output, "Search Doc ID: ")? else {
                        break;
                    };
                    let Ok(key) = line.parse::<Key>() else {
                        writeln!(output, "Invalid ID.")?;
                        continue;
                    };
                    match self.search_document(key) {
                        Some(doc) => writeln!(output, "\nFound: \n{doc}")?,
                        None => writeln!(output, "Document not found.")?,
                    }
                    match self.tree.root() {
                        Some(root) => writeln!(output, "Current Root: \n{root}")?,
                        None => writeln!(output, "Tree is empty.")?,
                    }
                }
                "3" => {
                    let Some(line) = prompt(&mut input, &mut output, "Doc ID: ")? else {
                        break;
                    };
                    let Ok(key) = line.parse::<Key>() else {
                        writeln!(output, "Invalid input.")?;
                        continue;
                    };
                    let Some(applicant) = prompt(&mut input, &mut output, "Applicant ID: ")? else {
                        break;
                    };
                    let Some(doc_type) = prompt(&mut input, &mut output, "Type (pdf/doc): ")? else {
                        break;
                    };
                    if self.insert_document(Document::new(key, applicant, doc_type)) {
                        writeln!(output, "Inserted document {key}.")?;
                    } else {
                        writeln!(
                            output,
                            "Document {key} already exists. Update or Search instead."
                        )?;
                    }
                }
                "4" => {
                    let Some(line) = prompt(&mut input, &mut output, "Update Doc ID: ")? else {
                        break;
                    };
                    let Ok(key) = line.parse::<Key>() else {
                        writeln!(output, "Invalid ID.")?;
                        continue;
                    };
                    let Some(status) =
                        prompt(&mut input, &mut output, "New Status (new/pending/verified): ")?
                    else {
                        break;
                    };
                    match self.update_document(key, status) {
                        Some(doc) => writeln!(
                            output,
                            "Updated Status to '{}' for Document {key}",
                            doc.status
                        )?,
                        None => writeln!(output, "Document not found.")?,
                    }
                }
                "5" => {
                    let Some(line) = prompt(&mut input, &mut output, "Delete Doc ID: ")? else {
                        break;
                    };
                    let Ok(key) = line.parse::<Key>() else {
                        writeln!(output, "Invalid ID.")?;
                        continue;
                    };
                    if self.delete_document(key) {
                        writeln!(output, "Deleted Document {key}")?;
                    } else {
                        writeln!(output, "Document not found, cannot delete.")?;
                    }
                }
                "6" => break,
                _ => writeln!(output, "Unknown choice.")?,
            }
        }

        writeln!(output, "Exiting.")?;
        output.flush()
    }
}

/// Writes `text`, then reads one line. `None` at end of input.
fn prompt<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn render_table(docs: &[Document]) -> String {
    const HEADERS: [&str; 4] = ["Doc ID", "Applicant ID", "Type", "Status"];

    let rows: Vec<[String; 4]> = docs
        .iter()
        .map(|d| {
            [
                d.doc_id.to_string(),
                d.applicant_id.clone(),
                d.doc_type.clone(),
                d.status.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let sep = {
        let cells: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+", cells.join("+"))
    };
    let line = |cells: &[&str]| {
        let cells: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        format!("| {} |", cells.join(" | "))
    };

    let mut table = vec![sep.clone(), line(&HEADERS), sep.clone()];
    for row in &rows {
        table.push(line(&row.each_ref().map(String::as_str)));
    }
    table.push(sep);
    table.join("\n")
}
