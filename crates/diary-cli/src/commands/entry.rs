//! Entry command handlers

use anyhow::{bail, Context, Result};

use diary_core::{Clock, EntryStore, Persistence};

use crate::editor::{confirm, edit_text, entry_buffer, parse_entry_buffer};
use crate::output::Output;

/// Write a new entry
///
/// With no text on the command line the editor is opened.
pub fn add<P: Persistence, C: Clock>(
    store: &mut EntryStore<P, C>,
    text: Vec<String>,
    mood: String,
    output: &Output,
) -> Result<()> {
    let (text, mood) = if text.is_empty() {
        let edited = edit_text(&entry_buffer("", &mood)).context("Failed to edit entry")?;
        parse_entry_buffer(&edited)
    } else {
        (text.join(" "), mood)
    };

    let entry = store.add(&text, &mood)?;

    if output.is_json() {
        output.print_entry(&entry);
    } else {
        output.success(&format!("Added entry {}", entry.id));
        output.saved(store.last_saved());
    }
    Ok(())
}

/// List entries, newest first
pub fn list<P: Persistence, C: Clock>(
    store: &EntryStore<P, C>,
    limit: Option<usize>,
    output: &Output,
) -> Result<()> {
    let entries = store.snapshot();
    let shown = match limit {
        Some(n) => &entries[..n.min(entries.len())],
        None => entries,
    };
    output.print_entries(shown);
    Ok(())
}

/// Show one entry in full
pub fn show<P: Persistence, C: Clock>(
    store: &EntryStore<P, C>,
    id: String,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(store, &id)?;
    let entry = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;
    output.print_entry(entry);
    Ok(())
}

/// Replace the text and/or mood of an entry
///
/// Whatever is not given keeps its current value.
pub fn update<P: Persistence, C: Clock>(
    store: &mut EntryStore<P, C>,
    id: String,
    text: Option<String>,
    mood: Option<String>,
    output: &Output,
) -> Result<()> {
    if text.is_none() && mood.is_none() {
        bail!("Nothing to update. Pass --text and/or --mood.");
    }

    let id = resolve_id(store, &id)?;
    let current = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;
    let text = text.unwrap_or_else(|| current.text.clone());
    let mood = mood.unwrap_or_else(|| current.mood.clone());

    let entry = store.update(&id, &text, &mood)?;

    if output.is_json() {
        output.print_entry(&entry);
    } else {
        output.success(&format!("Updated entry {}", entry.id));
        output.saved(store.last_saved());
    }
    Ok(())
}

/// Edit an entry in $EDITOR
pub fn edit<P: Persistence, C: Clock>(
    store: &mut EntryStore<P, C>,
    id: String,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(store, &id)?;
    let entry = store.begin_edit(&id)?;

    let edited = match edit_text(&entry_buffer(&entry.text, &entry.mood)) {
        Ok(content) => content,
        Err(e) => {
            store.cancel_edit();
            return Err(e).context("Failed to edit entry");
        }
    };
    let (text, mood) = parse_entry_buffer(&edited);

    if text == entry.text && mood == entry.mood {
        store.cancel_edit();
        output.message("No changes made.");
        return Ok(());
    }

    finish_edit(store, &text, &mood, output)
}

/// Commit the open edit session
fn finish_edit<P: Persistence, C: Clock>(
    store: &mut EntryStore<P, C>,
    text: &str,
    mood: &str,
    output: &Output,
) -> Result<()> {
    match store.save_edit(text, mood) {
        Ok(Some(entry)) => {
            if output.is_json() {
                output.print_entry(&entry);
            } else {
                output.success(&format!("Updated entry {}", entry.id));
                output.saved(store.last_saved());
            }
            Ok(())
        }
        Ok(None) => bail!("The entry was deleted while it was being edited. Changes discarded."),
        Err(e) => {
            store.cancel_edit();
            Err(e.into())
        }
    }
}

/// Delete an entry
pub fn delete<P: Persistence, C: Clock>(
    store: &mut EntryStore<P, C>,
    id: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(store, &id)?;

    if output.should_prompt() && !yes {
        if let Some(entry) = store.get(&id) {
            println!("Delete entry: {} - {}", entry.id, preview(&entry.text, 50));
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.remove(&id);
    output.success(&format!("Deleted entry: {}", id));
    output.saved(store.last_saved());
    Ok(())
}

/// Resolve an entry id (full id or unique prefix)
pub(crate) fn resolve_id<P: Persistence, C: Clock>(
    store: &EntryStore<P, C>,
    id: &str,
) -> Result<String> {
    if store.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<_> = store
        .snapshot()
        .iter()
        .filter(|e| e.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No entry found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple entries match '{}':", id);
            for entry in &matches {
                eprintln!("  {} - {}", entry.id, preview(&entry.text, 30));
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max_chars {
        format!("{}...", flat.chars().take(max_chars).collect::<String>())
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use diary_core::{Entry, ManualClock, MemoryPersistence};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn store_with(entries: &[Entry]) -> EntryStore<MemoryPersistence, ManualClock> {
        let blob = serde_json::to_vec(entries).unwrap();
        let mut store = EntryStore::new(MemoryPersistence::with_blob(blob), ManualClock::new(5_000));
        store.load();
        store
    }

    #[test]
    fn test_add_joins_words() {
        let mut store = store_with(&[]);
        add(
            &mut store,
            vec!["Had".into(), "a".into(), "good".into(), "day".into()],
            "happy".into(),
            &quiet(),
        )
        .unwrap();

        let entry = &store.snapshot()[0];
        assert_eq!(entry.text, "Had a good day");
        assert_eq!(entry.mood, "happy");
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = store_with(&[]);
        let err = add(&mut store, vec!["   ".into()], String::new(), &quiet()).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let store = store_with(&[
            Entry::new("alpha-1", "one", "", 2),
            Entry::new("beta-1", "two", "", 1),
        ]);
        assert_eq!(resolve_id(&store, "alpha-1").unwrap(), "alpha-1");
        assert_eq!(resolve_id(&store, "be").unwrap(), "beta-1");
        assert!(resolve_id(&store, "gamma").is_err());
    }

    #[test]
    fn test_resolve_id_ambiguous() {
        let store = store_with(&[
            Entry::new("abc-1", "one", "", 2),
            Entry::new("abc-2", "two", "", 1),
        ]);
        let err = resolve_id(&store, "abc").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_update_keeps_unspecified_fields() {
        let mut store = store_with(&[
            Entry::new("new", "Newer", "", 2),
            Entry::new("old", "Tired", "meh", 1),
        ]);
        update(&mut store, "old".into(), Some("Rested".into()), None, &quiet()).unwrap();

        let first = &store.snapshot()[0];
        assert_eq!(first.id, "old");
        assert_eq!(first.text, "Rested");
        assert_eq!(first.mood, "meh");
        assert_eq!(first.created_at, 1);
    }

    #[test]
    fn test_update_requires_a_change() {
        let mut store = store_with(&[Entry::new("a", "Text", "", 1)]);
        assert!(update(&mut store, "a".into(), None, None, &quiet()).is_err());
    }

    #[test]
    fn test_finish_edit_commits_session() {
        let mut store = store_with(&[Entry::new("a", "Had a good day", "happy", 1)]);
        store.begin_edit("a").unwrap();
        finish_edit(&mut store, "Had a great day", "happy", &quiet()).unwrap();

        assert!(!store.session().is_editing());
        assert_eq!(store.get("a").unwrap().text, "Had a great day");
    }

    #[test]
    fn test_finish_edit_after_delete_discards() {
        let mut store = store_with(&[Entry::new("a", "Had a good day", "happy", 1)]);
        store.begin_edit("a").unwrap();
        store.remove("a");

        let err = finish_edit(&mut store, "Changed", "", &quiet()).unwrap_err();
        assert!(err.to_string().contains("deleted"));
        assert!(store.is_empty());
        assert!(!store.session().is_editing());
    }

    #[test]
    fn test_finish_edit_validation_ends_session() {
        let mut store = store_with(&[Entry::new("a", "Text", "", 1)]);
        store.begin_edit("a").unwrap();

        assert!(finish_edit(&mut store, "  ", "", &quiet()).is_err());
        assert!(!store.session().is_editing());
        assert_eq!(store.get("a").unwrap().text, "Text");
    }

    #[test]
    fn test_delete_without_prompt() {
        let mut store = store_with(&[Entry::new("a", "Text", "", 1)]);
        delete(&mut store, "a".into(), false, &quiet()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("line one\nline two", 8), "line one...");
    }
}
