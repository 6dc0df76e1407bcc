use std::sync::Arc;

use gsm_session::{MenuNavigator, MenuPage, NavError, shared_memory_store};

fn nav() -> MenuNavigator {
    MenuNavigator::new(shared_memory_store())
}

#[test]
fn start_then_end_yields_root_only() {
    let nav = nav();
    nav.start("u1");
    assert_eq!(nav.end("u1").unwrap(), "0");
}

#[test]
fn end_lists_every_selection_in_order() {
    let nav = nav();
    nav.start("u1");
    for n in ["2", "10", "7", "7", "0"] {
        nav.select("u1", n).unwrap();
    }
    assert_eq!(nav.end("u1").unwrap(), "0,2,10,7,7,0");
}

#[test]
fn back_at_root_is_idempotent() {
    let nav = nav();
    nav.start("u1");
    for _ in 0..3 {
        let page = nav.back("u1").unwrap();
        assert_eq!(page, MenuPage::root());
        assert_eq!(nav.depth("u1"), Some(1));
    }
    assert_eq!(nav.end("u1").unwrap(), "0");
}

#[test]
fn select_then_back_restores_previous_page() {
    let nav = nav();
    nav.start("u1");
    let first = nav.select("u1", "3").unwrap();
    nav.select("u1", "6").unwrap();
    let restored = nav.back("u1").unwrap();
    assert_eq!(restored, first);
    assert_eq!(restored.options(), vec!["4", "5", "6", "7", "8", "Back", "End"]);
}

#[test]
fn non_numeric_selection_leaves_stack_alone() {
    let nav = nav();
    nav.start("u1");
    nav.select("u1", "2").unwrap();
    let err = nav.select("u1", "abc").unwrap_err();
    assert_eq!(err, NavError::InvalidInput("abc".into()));
    assert!(!err.is_benign());
    assert_eq!(nav.end("u1").unwrap(), "0,2");
}

#[test]
fn start_select_back_scenario() {
    let nav = nav();
    let root = nav.start("u1");
    assert_eq!(root.options(), vec!["1", "2", "3", "4", "5"]);

    let page = nav.select("u1", "3").unwrap();
    assert_eq!(page.numbers(), vec![4, 5, 6, 7, 8]);
    assert!(page.has_controls());

    let back = nav.back("u1").unwrap();
    assert_eq!(back.options(), vec!["1", "2", "3", "4", "5"]);
    assert!(!back.has_controls());
    assert_eq!(nav.depth("u1"), Some(1));
}

#[test]
fn two_selections_then_end() {
    let nav = nav();
    nav.start("u1");
    nav.select("u1", "2").unwrap();
    nav.select("u1", "10").unwrap();
    assert_eq!(nav.end("u1").unwrap(), "0,2,10");
}

#[test]
fn restart_resets_the_path() {
    let nav = nav();
    nav.start("u1");
    nav.select("u1", "4").unwrap();
    nav.start("u1");
    assert_eq!(nav.end("u1").unwrap(), "0");
}

#[test]
fn back_and_end_need_a_session() {
    let nav = nav();
    assert_eq!(nav.back("nobody"), Err(NavError::NoSession("nobody".into())));
    assert_eq!(nav.end("nobody"), Err(NavError::NoSession("nobody".into())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_users_do_not_interfere() {
    let nav = Arc::new(nav());
    let mut tasks = Vec::new();
    for user in 0..16u32 {
        let nav = nav.clone();
        tasks.push(tokio::spawn(async move {
            let id = format!("user-{user}");
            nav.start(&id);
            for step in 1..=20u32 {
                nav.select(&id, &(user * 100 + step).to_string()).unwrap();
            }
            nav.end(&id).unwrap()
        }));
    }

    for (user, task) in tasks.into_iter().enumerate() {
        let path = task.await.unwrap();
        let expected: Vec<String> = std::iter::once("0".to_string())
            .chain((1..=20u32).map(|step| (user as u32 * 100 + step).to_string()))
            .collect();
        assert_eq!(path, expected.join(","));
    }
    assert_eq!(nav.store().len(), 16);
}
