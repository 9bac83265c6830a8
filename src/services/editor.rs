//! Multi-tab puja editor.
//!
//! The editor keeps no server-side state: every step posts the whole draft,
//! the service rebuilds a [`PujaEditor`] from it, applies the pressed button
//! and hands the result back for rendering.

use crate::domain::puja::PujaDraft;
use crate::domain::types::PujaId;
use crate::dto::pujas::{EditorPageData, SubmitOutcome};
use crate::forms::puja::{EditorAction, PujaEditorForm};
use crate::repository::{PujaReader, PujaWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::wizard::PujaEditor;

/// Opens a blank editor, or loads an existing puja when `id` is given.
pub fn open_editor<R>(repo: &R, id: Option<&str>) -> ServiceResult<EditorPageData>
where
    R: PujaReader + ?Sized,
{
    let Some(raw_id) = id else {
        return Ok(EditorPageData::new(PujaEditor::new(PujaDraft::default())));
    };

    let id = PujaId::new(raw_id)?;
    let draft = repo
        .get_puja(&id)
        .map_err(|err| {
            log::error!("Failed to load puja {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(EditorPageData::new(PujaEditor::new(draft)))
}

/// Applies one navigation or list-editing button to the posted draft.
pub fn step_editor(form: PujaEditorForm) -> ServiceResult<EditorPageData> {
    let draft = form.draft()?;
    let action = form.action()?;
    let mut editor = PujaEditor::new(draft).at(form.active_tab());

    match action {
        EditorAction::Next => {
            editor.next();
        }
        EditorAction::Previous => editor.previous(),
        EditorAction::GoTo(tab) => {
            editor.jump_to(tab);
        }
        EditorAction::Add(tab) => editor.add_item(tab),
        EditorAction::Remove(tab, index) => editor.remove_item(tab, index),
    }

    Ok(EditorPageData::new(editor))
}

/// Re-validates every tab and saves the puja when nothing fails.
pub fn submit_editor<R>(repo: &R, form: PujaEditorForm) -> ServiceResult<SubmitOutcome>
where
    R: PujaWriter + ?Sized,
{
    let draft = form.draft()?;
    let mut editor = PujaEditor::new(draft).at(form.active_tab());

    let grouped = editor.validate_all();
    if !grouped.is_empty() {
        log::warn!("Puja draft has errors on {} tab(s)", grouped.len());
        return Ok(SubmitOutcome::Invalid(EditorPageData::with_errors(
            editor, &grouped,
        )));
    }

    let draft = editor.draft.sanitized();
    match &draft.id {
        Some(id) => {
            repo.update_puja(id, &draft).map_err(|err| {
                log::error!("Failed to update puja {id}: {err}");
                err
            })?;
            log::info!("Updated puja {id}");
            Ok(SubmitOutcome::Updated)
        }
        None => {
            repo.create_puja(&draft).map_err(|err| {
                log::error!("Failed to create puja: {err}");
                err
            })?;
            log::info!("Created puja `{}`", draft.basic.title);
            Ok(SubmitOutcome::Created)
        }
    }
}
