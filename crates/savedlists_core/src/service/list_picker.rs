//! Interactive list selection, creation and rename workflows.
//!
//! # Responsibility
//! - Turn store contents into an ordered set of user choices.
//! - Resolve one user choice into a list id and hand it to a continuation.
//! - Run the create / rename name prompts against the store.
//!
//! # Invariants
//! - Option order is fixed: lists (display order), then "all lists"
//!   (unless restricted to concrete lists), then "create new list".
//! - A continuation runs at most once; dismissal and any store failure
//!   simply leave it uncalled.
//! - Blank names never reach the store.
//! - Workflows never surface store errors except the create failure
//!   notice; everything else is logged and swallowed.

use crate::model::collation::TitleCollator;
use crate::model::list::{ListId, StoredList, ALL_LIST_ID, TEMPORARY_LIST_ID};
use crate::repo::list_repo::ListStore;
use crate::service::list_service::{normalize_list_title, sort_lists};
use log::{debug, error, info, warn};

/// Single-select choice request shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoicePrompt<'a> {
    pub title: &'a str,
    pub options: &'a [String],
}

/// Text input request shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPrompt<'a> {
    pub title: &'a str,
    /// Pre-filled input value.
    pub initial: &'a str,
    pub confirm_label: &'a str,
    pub cancel_label: &'a str,
}

/// Kind of a transient user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    ListCreated,
    ListCreateFailed,
}

/// Transient user notification (toast-style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// User interaction seam for the list workflows.
///
/// Every call is a one-shot exchange. `None` means the user dismissed the
/// prompt; the workflow then ends without calling its continuation.
pub trait ListPrompter {
    /// Presents `options` and returns the chosen index.
    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Option<usize>;
    /// Presents a text field and returns the raw entered text.
    fn input_text(&mut self, prompt: &TextPrompt<'_>) -> Option<String>;
    fn notify(&mut self, notice: &Notice);
}

impl<T: ListPrompter + ?Sized> ListPrompter for &mut T {
    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Option<usize> {
        (**self).choose(prompt)
    }

    fn input_text(&mut self, prompt: &TextPrompt<'_>) -> Option<String> {
        (**self).input_text(prompt)
    }

    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// User-facing strings of the workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerLabels {
    pub all_lists: String,
    pub create_list: String,
    pub create_title: String,
    pub create_confirm: String,
    pub rename_title: String,
    pub rename_confirm: String,
    pub cancel: String,
    pub list_created: String,
    pub list_create_failed: String,
}

impl Default for PickerLabels {
    fn default() -> Self {
        Self {
            all_lists: "All lists".to_string(),
            create_list: "Create new list".to_string(),
            create_title: "New list".to_string(),
            create_confirm: "Create".to_string(),
            rename_title: "Rename list".to_string(),
            rename_confirm: "Rename".to_string(),
            cancel: "Cancel".to_string(),
            list_created: "List created".to_string(),
            list_create_failed: "Could not create list".to_string(),
        }
    }
}

/// Parameters of one list selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectListRequest {
    /// Title of the choice prompt.
    pub prompt: String,
    /// Hide the "all lists" option.
    pub only_concrete_lists: bool,
    /// List to leave out, typically the one the items already live in.
    pub except_list_id: Option<ListId>,
    /// Pre-filled name when the user picks "create new list".
    pub new_list_name_default: String,
}

impl SelectListRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn only_concrete_lists(mut self) -> Self {
        self.only_concrete_lists = true;
        self
    }

    pub fn except_list(mut self, list_id: ListId) -> Self {
        self.except_list_id = Some(list_id);
        self
    }

    pub fn new_list_name(mut self, name: impl Into<String>) -> Self {
        self.new_list_name_default = name.into();
        self
    }
}

/// What a chosen option index stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceTarget {
    /// Index into the presented list sequence.
    List(usize),
    AllLists,
    CreateList,
}

/// Builds option labels for `lists` (already sorted and filtered).
pub fn build_options(
    lists: &[StoredList],
    only_concrete_lists: bool,
    labels: &PickerLabels,
) -> Vec<String> {
    let mut options = lists
        .iter()
        .map(StoredList::title_and_count)
        .collect::<Vec<_>>();
    if !only_concrete_lists {
        options.push(format!("<{}>", labels.all_lists));
    }
    options.push(format!("<{}>", labels.create_list));
    options
}

/// Maps a chosen option index to its meaning.
///
/// Any index at or past `list_count` that is not the "all lists" slot means
/// "create". With `only_concrete_lists` the create option itself sits at
/// `list_count`, so the rule stays exact. Indices past the last option
/// yield `None`.
pub fn resolve_choice(
    index: usize,
    list_count: usize,
    only_concrete_lists: bool,
) -> Option<ChoiceTarget> {
    let option_count = list_count + if only_concrete_lists { 1 } else { 2 };
    if index >= option_count {
        return None;
    }
    if index == list_count && !only_concrete_lists {
        return Some(ChoiceTarget::AllLists);
    }
    if index >= list_count {
        return Some(ChoiceTarget::CreateList);
    }
    Some(ChoiceTarget::List(index))
}

/// List workflows over an injected store and prompter.
pub struct ListPicker<S: ListStore, P: ListPrompter> {
    store: S,
    prompter: P,
    collator: TitleCollator,
    labels: PickerLabels,
}

impl<S: ListStore, P: ListPrompter> ListPicker<S, P> {
    pub fn new(store: S, prompter: P) -> Self {
        Self {
            store,
            prompter,
            collator: TitleCollator::default(),
            labels: PickerLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: PickerLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_collator(mut self, collator: TitleCollator) -> Self {
        self.collator = collator;
        self
    }

    /// Lets the user pick a list and passes its id to `on_selected`.
    ///
    /// Choosing "create new list" runs [`ListPicker::create_list`] and
    /// forwards the new id on success.
    pub fn select_list<F>(&mut self, request: &SelectListRequest, on_selected: F)
    where
        F: FnOnce(ListId),
    {
        let Some(lists) = self.presentable_lists(request) else {
            return;
        };
        let options = build_options(&lists, request.only_concrete_lists, &self.labels);
        let prompt = ChoicePrompt {
            title: request.prompt.as_str(),
            options: options.as_slice(),
        };

        let Some(index) = self.prompter.choose(&prompt) else {
            debug!("event=list_select module=picker status=dismissed");
            return;
        };

        match resolve_choice(index, lists.len(), request.only_concrete_lists) {
            Some(ChoiceTarget::List(position)) => {
                let list_id = lists[position].id;
                debug!("event=list_select module=picker status=ok list_id={list_id}");
                on_selected(list_id);
            }
            Some(ChoiceTarget::AllLists) => {
                debug!("event=list_select module=picker status=ok list_id={ALL_LIST_ID}");
                on_selected(ALL_LIST_ID);
            }
            Some(ChoiceTarget::CreateList) => {
                self.create_list(request.new_list_name_default.as_str(), on_selected);
            }
            None => {
                warn!(
                    "event=list_select module=picker status=ignored reason=index_out_of_range index={index} options={}",
                    options.len()
                );
            }
        }
    }

    /// Asks for a new list name, creates the list and passes its id on.
    ///
    /// Cancel or a blank name ends silently without touching the store.
    pub fn create_list<F>(&mut self, default_name: &str, on_created: F)
    where
        F: FnOnce(ListId),
    {
        let prompt = TextPrompt {
            title: self.labels.create_title.as_str(),
            initial: default_name,
            confirm_label: self.labels.create_confirm.as_str(),
            cancel_label: self.labels.cancel.as_str(),
        };
        let Some(name) = self
            .prompter
            .input_text(&prompt)
            .as_deref()
            .and_then(normalize_list_title)
        else {
            debug!("event=list_create module=picker status=skipped reason=no_name");
            return;
        };

        let first_custom_id = self.store.first_custom_id();
        let created = match self.store.create_list(name.as_str()) {
            Ok(list_id) if list_id >= first_custom_id => Some(list_id),
            Ok(list_id) => {
                warn!(
                    "event=list_create module=picker status=error error_code=id_below_offset list_id={list_id} first_custom_id={first_custom_id}"
                );
                None
            }
            Err(err) => {
                error!("event=list_create module=picker status=error error_code=store_failed error={err}");
                None
            }
        };

        match created {
            Some(list_id) => {
                info!("event=list_create module=picker status=ok list_id={list_id}");
                self.prompter.notify(&Notice {
                    kind: NoticeKind::ListCreated,
                    message: self.labels.list_created.clone(),
                });
                on_created(list_id);
            }
            None => {
                self.prompter.notify(&Notice {
                    kind: NoticeKind::ListCreateFailed,
                    message: self.labels.list_create_failed.clone(),
                });
            }
        }
    }

    /// Asks for a new name of `list_id`, renames it, then runs `on_done`.
    ///
    /// `on_done` runs whenever a name was submitted, even if the store
    /// failed to apply it. Pass `|| {}` when no follow-up is needed.
    pub fn rename_list<F>(&mut self, list_id: ListId, on_done: F)
    where
        F: FnOnce(),
    {
        let list = match self.store.get_list(list_id) {
            Ok(Some(list)) => list,
            Ok(None) => {
                warn!("event=list_rename module=picker status=skipped reason=not_found list_id={list_id}");
                return;
            }
            Err(err) => {
                error!("event=list_rename module=picker status=error list_id={list_id} error={err}");
                return;
            }
        };

        let prompt = TextPrompt {
            title: self.labels.rename_title.as_str(),
            initial: list.title.as_str(),
            confirm_label: self.labels.rename_confirm.as_str(),
            cancel_label: self.labels.cancel.as_str(),
        };
        let Some(name) = self
            .prompter
            .input_text(&prompt)
            .as_deref()
            .and_then(normalize_list_title)
        else {
            debug!("event=list_rename module=picker status=skipped reason=no_name list_id={list_id}");
            return;
        };

        match self.store.rename_list(list_id, name.as_str()) {
            Ok(()) => info!("event=list_rename module=picker status=ok list_id={list_id}"),
            Err(err) => warn!(
                "event=list_rename module=picker status=error list_id={list_id} error={err}"
            ),
        }
        on_done();
    }

    fn presentable_lists(&self, request: &SelectListRequest) -> Option<Vec<StoredList>> {
        let mut lists = match self.store.lists() {
            Ok(lists) if !lists.is_empty() => lists,
            Ok(_) => {
                info!("event=list_select module=picker status=aborted reason=no_lists");
                return None;
            }
            Err(err) => {
                error!("event=list_select module=picker status=aborted reason=store_failed error={err}");
                return None;
            }
        };
        sort_lists(&mut lists, &self.collator);

        if let Some(except_id) = request
            .except_list_id
            .filter(|list_id| *list_id > TEMPORARY_LIST_ID)
        {
            match self.store.get_list(except_id) {
                Ok(Some(excluded)) => {
                    if let Some(position) = lists.iter().position(|list| *list == excluded) {
                        lists.remove(position);
                    }
                }
                Ok(None) => {
                    debug!("event=list_select module=picker status=ok reason=except_not_found list_id={except_id}");
                }
                Err(err) => {
                    warn!("event=list_select module=picker status=ok reason=except_lookup_failed list_id={except_id} error={err}");
                }
            }
        }

        Some(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::{build_options, resolve_choice, ChoiceTarget, PickerLabels};
    use crate::model::list::StoredList;

    #[test]
    fn options_end_with_all_and_create() {
        let lists = vec![StoredList::new(1, "Stored", 2), StoredList::new(11, "Trips", 0)];
        let options = build_options(&lists, false, &PickerLabels::default());
        assert_eq!(
            options,
            vec![
                "Stored [2]".to_string(),
                "Trips [0]".to_string(),
                "<All lists>".to_string(),
                "<Create new list>".to_string(),
            ]
        );
    }

    #[test]
    fn concrete_only_options_omit_all_lists() {
        let lists = vec![StoredList::new(1, "Stored", 0)];
        let options = build_options(&lists, true, &PickerLabels::default());
        assert_eq!(options, vec!["Stored [0]", "<Create new list>"]);
    }

    #[test]
    fn resolve_choice_with_all_lists_option() {
        assert_eq!(resolve_choice(0, 2, false), Some(ChoiceTarget::List(0)));
        assert_eq!(resolve_choice(1, 2, false), Some(ChoiceTarget::List(1)));
        assert_eq!(resolve_choice(2, 2, false), Some(ChoiceTarget::AllLists));
        assert_eq!(resolve_choice(3, 2, false), Some(ChoiceTarget::CreateList));
        assert_eq!(resolve_choice(4, 2, false), None);
    }

    #[test]
    fn resolve_choice_concrete_only_maps_list_count_slot_to_create() {
        assert_eq!(resolve_choice(1, 2, true), Some(ChoiceTarget::List(1)));
        assert_eq!(resolve_choice(2, 2, true), Some(ChoiceTarget::CreateList));
        assert_eq!(resolve_choice(3, 2, true), None);
    }

    #[test]
    fn resolve_choice_without_lists() {
        assert_eq!(resolve_choice(0, 0, false), Some(ChoiceTarget::AllLists));
        assert_eq!(resolve_choice(0, 0, true), Some(ChoiceTarget::CreateList));
    }
}
