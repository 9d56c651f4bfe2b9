use savedlists_core::db::open_db_in_memory;
use savedlists_core::{
    ChoicePrompt, CollationStrength, ListId, ListPicker, ListPrompter, ListStore, Notice,
    NoticeKind, PickerLabels, RepoError, RepoResult, SelectListRequest, SqliteListStore,
    StoredList, TextPrompt, TitleCollator, ALL_LIST_ID, STANDARD_LIST_ID,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

const FIRST_CUSTOM_ID: ListId = 10;

/// In-memory store that records every call it receives.
#[derive(Default)]
struct FakeStore {
    lists: RefCell<Vec<StoredList>>,
    calls: RefCell<Vec<String>>,
    fail_lists: bool,
    fail_get: bool,
    fail_rename: bool,
    create_result: Option<ListId>,
}

impl FakeStore {
    fn with_lists(lists: Vec<StoredList>) -> Self {
        Self {
            lists: RefCell::new(lists),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with("create") || call.starts_with("rename"))
            .collect()
    }
}

impl ListStore for FakeStore {
    fn lists(&self) -> RepoResult<Vec<StoredList>> {
        self.calls.borrow_mut().push("lists".to_string());
        if self.fail_lists {
            return Err(RepoError::InvalidData("store offline".to_string()));
        }
        Ok(self.lists.borrow().clone())
    }

    fn get_list(&self, list_id: ListId) -> RepoResult<Option<StoredList>> {
        self.calls.borrow_mut().push(format!("get {list_id}"));
        if self.fail_get {
            return Err(RepoError::InvalidData("lookup failed".to_string()));
        }
        Ok(self
            .lists
            .borrow()
            .iter()
            .find(|list| list.id == list_id)
            .cloned())
    }

    fn create_list(&self, title: &str) -> RepoResult<ListId> {
        self.calls.borrow_mut().push(format!("create {title}"));
        if let Some(result) = self.create_result {
            return Ok(result);
        }
        let mut lists = self.lists.borrow_mut();
        let next_id = lists
            .iter()
            .map(|list| list.id)
            .max()
            .unwrap_or(0)
            .max(FIRST_CUSTOM_ID)
            + 1;
        lists.push(StoredList::new(next_id, title, 0));
        Ok(next_id)
    }

    fn rename_list(&self, list_id: ListId, title: &str) -> RepoResult<()> {
        self.calls
            .borrow_mut()
            .push(format!("rename {list_id} {title}"));
        if self.fail_rename {
            return Err(RepoError::NotFound(list_id));
        }
        Ok(())
    }

    fn delete_list(&self, _list_id: ListId) -> RepoResult<bool> {
        unreachable!("workflows never delete lists")
    }

    fn first_custom_id(&self) -> ListId {
        FIRST_CUSTOM_ID
    }

    fn save_item(&self, _item_key: &str, _list_id: ListId) -> RepoResult<()> {
        unreachable!("workflows never touch items")
    }

    fn remove_item(&self, _item_key: &str) -> RepoResult<bool> {
        unreachable!("workflows never touch items")
    }

    fn items_in_list(&self, _list_id: ListId) -> RepoResult<Vec<String>> {
        unreachable!("workflows never touch items")
    }
}

/// Prompter replaying scripted answers and recording what it was shown.
#[derive(Default)]
struct ScriptedPrompter {
    choices: VecDeque<Option<usize>>,
    inputs: VecDeque<Option<String>>,
    shown_options: Vec<Vec<String>>,
    shown_titles: Vec<String>,
    shown_initial: Vec<String>,
    notices: Vec<Notice>,
}

impl ScriptedPrompter {
    fn choosing(index: usize) -> Self {
        Self {
            choices: VecDeque::from([Some(index)]),
            ..Self::default()
        }
    }

    fn then_typing(mut self, text: &str) -> Self {
        self.inputs.push_back(Some(text.to_string()));
        self
    }
}

impl ListPrompter for ScriptedPrompter {
    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Option<usize> {
        self.shown_titles.push(prompt.title.to_string());
        self.shown_options.push(prompt.options.to_vec());
        self.choices.pop_front().flatten()
    }

    fn input_text(&mut self, prompt: &TextPrompt<'_>) -> Option<String> {
        self.shown_initial.push(prompt.initial.to_string());
        self.inputs.pop_front().flatten()
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

fn three_lists() -> Vec<StoredList> {
    vec![
        StoredList::new(6, "Beta", 1),
        StoredList::new(STANDARD_LIST_ID, "Z", 4),
        StoredList::new(5, "Alpha", 2),
    ]
}

fn run_select(
    store: &FakeStore,
    prompter: &mut ScriptedPrompter,
    request: &SelectListRequest,
) -> Vec<ListId> {
    let received = RefCell::new(Vec::new());
    let mut picker = ListPicker::new(store, prompter);
    picker.select_list(request, |list_id| received.borrow_mut().push(list_id));
    received.into_inner()
}

#[test]
fn options_follow_display_order_with_synthetic_entries_last() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::default();

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Move to"));

    assert!(received.is_empty());
    assert_eq!(prompter.shown_titles, vec!["Move to".to_string()]);
    assert_eq!(
        prompter.shown_options[0],
        vec![
            "Z [4]".to_string(),
            "Alpha [2]".to_string(),
            "Beta [1]".to_string(),
            "<All lists>".to_string(),
            "<Create new list>".to_string(),
        ]
    );
}

#[test]
fn choosing_a_list_passes_its_id() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::choosing(1);

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Move to"));
    assert_eq!(received, vec![5]);
}

#[test]
fn all_lists_slot_yields_all_list_id_without_store_mutation() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::choosing(3);

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Show"));

    assert_eq!(received, vec![ALL_LIST_ID]);
    assert!(store.mutations().is_empty());
    assert!(prompter.shown_initial.is_empty());
}

#[test]
fn excluded_list_is_removed_before_building_options() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::choosing(1);

    let request = SelectListRequest::new("Move to").except_list(5);
    let received = run_select(&store, &mut prompter, &request);

    assert_eq!(
        prompter.shown_options[0],
        vec![
            "Z [4]".to_string(),
            "Beta [1]".to_string(),
            "<All lists>".to_string(),
            "<Create new list>".to_string(),
        ]
    );
    assert_eq!(received, vec![6]);
}

#[test]
fn exclusion_of_temporary_id_skips_lookup() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::default();

    run_select(
        &store,
        &mut prompter,
        &SelectListRequest::new("Move to").except_list(0),
    );

    assert_eq!(store.calls(), vec!["lists".to_string()]);
    assert_eq!(prompter.shown_options[0].len(), 5);
}

#[test]
fn failed_exclusion_lookup_proceeds_unfiltered() {
    let store = FakeStore {
        fail_get: true,
        ..FakeStore::with_lists(three_lists())
    };
    let mut prompter = ScriptedPrompter::choosing(1);

    let received = run_select(
        &store,
        &mut prompter,
        &SelectListRequest::new("Move to").except_list(5),
    );

    assert_eq!(prompter.shown_options[0].len(), 5);
    assert_eq!(received, vec![5]);
}

#[test]
fn unknown_excluded_id_proceeds_unfiltered() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::default();

    run_select(
        &store,
        &mut prompter,
        &SelectListRequest::new("Move to").except_list(77),
    );

    assert_eq!(prompter.shown_options[0].len(), 5);
}

#[test]
fn store_failure_aborts_without_prompting() {
    let store = FakeStore {
        fail_lists: true,
        ..FakeStore::default()
    };
    let mut prompter = ScriptedPrompter::choosing(0);

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Move to"));

    assert!(received.is_empty());
    assert!(prompter.shown_options.is_empty());
    assert!(prompter.notices.is_empty());
}

#[test]
fn empty_store_aborts_without_prompting() {
    let store = FakeStore::default();
    let mut prompter = ScriptedPrompter::choosing(0);

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Move to"));

    assert!(received.is_empty());
    assert!(prompter.shown_options.is_empty());
}

#[test]
fn dismissal_never_calls_the_continuation() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter {
        choices: VecDeque::from([None]),
        ..ScriptedPrompter::default()
    };

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Move to"));
    assert!(received.is_empty());
}

#[test]
fn out_of_range_choice_is_ignored() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::choosing(9);

    let received = run_select(&store, &mut prompter, &SelectListRequest::new("Move to"));

    assert!(received.is_empty());
    assert!(store.mutations().is_empty());
}

#[test]
fn create_option_runs_creation_with_prefilled_name() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::choosing(4).then_typing("  My Trips  ");

    let request = SelectListRequest::new("Move to").new_list_name("Suggested");
    let received = run_select(&store, &mut prompter, &request);

    assert_eq!(prompter.shown_initial, vec!["Suggested".to_string()]);
    assert_eq!(store.mutations(), vec!["create My Trips".to_string()]);
    assert_eq!(received, vec![11]);
    assert_eq!(prompter.notices.len(), 1);
    assert_eq!(prompter.notices[0].kind, NoticeKind::ListCreated);
}

#[test]
fn concrete_only_selection_puts_create_at_list_count() {
    // Regression: with the "all lists" option hidden, the slot at the list
    // count is "create", never "all lists".
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::choosing(3).then_typing("Fresh");

    let request = SelectListRequest::new("Copy to").only_concrete_lists();
    let received = run_select(&store, &mut prompter, &request);

    assert_eq!(
        prompter.shown_options[0].last().map(String::as_str),
        Some("<Create new list>")
    );
    assert_eq!(prompter.shown_options[0].len(), 4);
    assert_eq!(store.mutations(), vec!["create Fresh".to_string()]);
    assert_eq!(received, vec![11]);
}

#[test]
fn blank_name_never_reaches_the_store() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::default().then_typing("   ");
    let called = Cell::new(false);

    let mut picker = ListPicker::new(&store, &mut prompter);
    picker.create_list("", |_| called.set(true));

    assert!(!called.get());
    assert!(store.mutations().is_empty());
    assert!(prompter.notices.is_empty());
}

#[test]
fn cancelled_name_prompt_ends_silently() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter {
        inputs: VecDeque::from([None]),
        ..ScriptedPrompter::default()
    };
    let called = Cell::new(false);

    ListPicker::new(&store, &mut prompter).create_list("Draft", |_| called.set(true));

    assert!(!called.get());
    assert!(store.mutations().is_empty());
}

#[test]
fn id_below_offset_reports_failure_and_skips_continuation() {
    let store = FakeStore {
        create_result: Some(-1),
        ..FakeStore::with_lists(three_lists())
    };
    let mut prompter = ScriptedPrompter::default().then_typing("Broken");
    let called = Cell::new(false);

    ListPicker::new(&store, &mut prompter).create_list("", |_| called.set(true));

    assert!(!called.get());
    assert_eq!(store.mutations(), vec!["create Broken".to_string()]);
    assert_eq!(prompter.notices.len(), 1);
    assert_eq!(prompter.notices[0].kind, NoticeKind::ListCreateFailed);
    assert_eq!(prompter.notices[0].message, "Could not create list");
}

#[test]
fn rename_prefills_current_title_and_always_reports_done() {
    let store = FakeStore {
        fail_rename: true,
        ..FakeStore::with_lists(three_lists())
    };
    let mut prompter = ScriptedPrompter::default().then_typing(" Gamma ");
    let done = Cell::new(0);

    ListPicker::new(&store, &mut prompter).rename_list(6, || done.set(done.get() + 1));

    assert_eq!(prompter.shown_initial, vec!["Beta".to_string()]);
    assert_eq!(store.mutations(), vec!["rename 6 Gamma".to_string()]);
    assert_eq!(done.get(), 1);
}

#[test]
fn rename_with_blank_name_does_nothing() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::default().then_typing("\t");
    let done = Cell::new(false);

    ListPicker::new(&store, &mut prompter).rename_list(6, || done.set(true));

    assert!(!done.get());
    assert!(store.mutations().is_empty());
}

#[test]
fn rename_of_missing_list_does_not_prompt() {
    let store = FakeStore::with_lists(three_lists());
    let mut prompter = ScriptedPrompter::default().then_typing("Ghost");
    let done = Cell::new(false);

    ListPicker::new(&store, &mut prompter).rename_list(404, || done.set(true));

    assert!(!done.get());
    assert!(prompter.shown_initial.is_empty());
}

#[test]
fn custom_labels_and_collator_shape_the_options() {
    let store = FakeStore::with_lists(vec![
        StoredList::new(11, "TRIP", 0),
        StoredList::new(12, "trip", 0),
        StoredList::new(STANDARD_LIST_ID, "Saved", 3),
    ]);
    let labels = PickerLabels {
        all_lists: "Everything".to_string(),
        create_list: "Start a list".to_string(),
        ..PickerLabels::default()
    };
    let mut prompter = ScriptedPrompter::default();

    let mut picker = ListPicker::new(&store, &mut prompter)
        .with_labels(labels)
        .with_collator(TitleCollator::new(CollationStrength::Primary));
    picker.select_list(&SelectListRequest::new("Move to"), |_| {
        panic!("dismissed selection must not call back")
    });

    // Primary strength ties the two titles, so store order survives.
    assert_eq!(
        prompter.shown_options,
        vec![vec![
            "Saved [3]",
            "TRIP [0]",
            "trip [0]",
            "<Everything>",
            "<Start a list>",
        ]]
    );
}

#[test]
fn full_flow_against_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteListStore::try_new(&conn).unwrap();
    let existing = store.create_list("Zoo").unwrap();

    let mut prompter = ScriptedPrompter::choosing(2).then_typing("Attic ");
    let created = Cell::new(None);
    let mut picker = ListPicker::new(&store, &mut prompter);
    picker.select_list(
        &SelectListRequest::new("Save to").only_concrete_lists(),
        |list_id| created.set(Some(list_id)),
    );

    let created = created.get().expect("list should be created");
    assert!(created > existing);
    let lists = store.lists().unwrap();
    assert_eq!(lists.len(), 3);
    assert_eq!(
        store.get_list(created).unwrap().unwrap().title,
        "Attic".to_string()
    );

    let mut prompter = ScriptedPrompter::choosing(1);
    let chosen = Cell::new(None);
    ListPicker::new(&store, &mut prompter).select_list(
        &SelectListRequest::new("Save to").except_list(existing),
        |list_id| chosen.set(Some(list_id)),
    );
    assert_eq!(
        prompter.shown_options[0],
        vec![
            "Stored [0]".to_string(),
            "Attic [0]".to_string(),
            "<All lists>".to_string(),
            "<Create new list>".to_string(),
        ]
    );
    assert_eq!(chosen.get(), Some(created));
}
