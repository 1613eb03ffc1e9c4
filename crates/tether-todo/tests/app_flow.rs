#![forbid(unsafe_code)]

//! The mounted page driven through its handlers.

use proptest::prelude::*;
use tether_dom::{AttrValue, Event};
use tether_harness::Mount;
use tether_reactive::publisher;
use tether_todo::app;
use tether_todo::model::{self, TodoItem, TodoList, todo_list};

fn mount(list: &TodoList) -> Mount {
    let fragment = publisher(String::from("/"));
    Mount::new(&app(list, &fragment.observe()).expect("valid page"))
}

fn count_text(mount: &Mount) -> String {
    mount.find(".todo-count").expect("todo count").text()
}

fn type_item(mount: &Mount, text: &str) {
    assert!(mount.dispatch(".new-todo", "keyup", &mut Event::key_up(13, text)));
}

#[test]
fn empty_page_hides_footer_and_toggle() {
    let list = todo_list(Vec::new());
    let mount = mount(&list);

    assert_eq!(count_text(&mount), "0 items left");
    let footer = mount.find("footer.footer").expect("footer");
    assert_eq!(footer.style("display").as_deref(), Some("none"));
    let toggle = mount.find(".toggle-all").expect("toggle-all");
    assert_eq!(toggle.style("display").as_deref(), Some("none"));
    assert!(mount.find_all("li.completed").is_empty());
    assert_eq!(mount.find(".todo-list").expect("list").children().len(), 0);
}

#[test]
fn typing_toggling_and_clearing() {
    let list = todo_list(Vec::new());
    let mount = mount(&list);

    type_item(&mount, "  milk ");
    type_item(&mount, "eggs");
    assert_eq!(count_text(&mount), "2 items left");
    let labels: Vec<String> = mount.find_all("label").iter().map(|l| l.text()).collect();
    assert_eq!(labels, ["Mark all as complete", "milk", "eggs"]);
    assert_eq!(
        mount.find("footer.footer").and_then(|f| f.style("display")).as_deref(),
        Some("block")
    );

    let toggles = mount.find_all("input.toggle");
    assert_eq!(toggles.len(), 2);
    assert!(toggles[0].dispatch("click", &mut Event::click()));
    assert_eq!(count_text(&mount), "1 item left");
    assert_eq!(mount.find_all("li.completed").len(), 1);
    assert_eq!(toggles[0].attribute("checked"), Some(AttrValue::Bool(true)));
    assert_eq!(
        mount.find(".clear-completed").and_then(|b| b.style("visibility")).as_deref(),
        Some("visible")
    );

    assert!(mount.dispatch(".clear-completed", "click", &mut Event::click()));
    assert_eq!(count_text(&mount), "1 item left");
    let labels: Vec<String> = mount.find_all("label").iter().map(|l| l.text()).collect();
    assert_eq!(labels, ["Mark all as complete", "eggs"]);
    assert_eq!(
        mount.find(".clear-completed").and_then(|b| b.style("visibility")).as_deref(),
        Some("hidden")
    );
}

#[test]
fn toggle_all_checks_when_every_item_is_done() {
    let list = todo_list(vec![TodoItem::new("a"), TodoItem::new("b")]);
    let mount = mount(&list);

    assert!(mount.dispatch(".toggle-all", "click", &mut Event::checked(true)));
    assert_eq!(count_text(&mount), "0 items left");
    assert_eq!(
        mount.find(".toggle-all").and_then(|t| t.attribute("checked")),
        Some(AttrValue::Bool(true))
    );
    assert!(mount.markup().contains("id=\"toggle-all\" class=\"toggle-all\" type=\"checkbox\" checked"));

    assert!(mount.dispatch("input.toggle", "click", &mut Event::click()));
    assert_eq!(count_text(&mount), "1 item left");
    assert_eq!(
        mount.find(".toggle-all").and_then(|t| t.attribute("checked")),
        Some(AttrValue::Unset)
    );
}

#[test]
fn destroy_rebuilds_rows_and_releases_old_bindings() {
    let a = TodoItem::new("a");
    let list = todo_list(vec![a.clone(), TodoItem::new("b")]);
    let mount = mount(&list);
    let before = a.completed.subscriber_count();
    assert!(before > 0);

    assert!(mount.dispatch(".destroy", "click", &mut Event::click()));
    assert_eq!(count_text(&mount), "1 item left");
    assert_eq!(mount.find_all("input.toggle").len(), 1);
    assert_eq!(a.completed.subscriber_count(), 0);
}

#[test]
fn held_row_handle_stops_updating_after_destroy() {
    let a = TodoItem::new("a");
    let list = todo_list(vec![a.clone(), TodoItem::new("b")]);
    let mount = mount(&list);
    let held = mount
        .find(".todo-list")
        .and_then(|ul| ul.find("li"))
        .expect("first row");

    assert!(mount.dispatch(".destroy", "click", &mut Event::click()));
    assert_eq!(a.completed.subscriber_count(), 0);
    assert_eq!(held.binding_count(), 0);

    a.completed.set(true);
    assert_eq!(held.attribute("class"), Some(AttrValue::from("")));
    assert!(!held.markup().contains("checked"));
}

#[test]
fn edit_round_trip_through_mount() {
    let list = todo_list(vec![TodoItem::new("a")]);
    let mount = mount(&list);
    let view = mount.find("div.view").expect("row view");
    let edit = mount.find("input.edit").expect("edit field");

    assert!(view.dispatch("dblclick", &mut Event::click()));
    assert_eq!(view.style("display").as_deref(), Some("none"));
    assert_eq!(edit.style("display").as_deref(), Some("block"));

    assert!(edit.dispatch("change", &mut Event::change(" b ")));
    assert_eq!(view.style("display").as_deref(), Some("block"));
    assert_eq!(edit.attribute("value"), Some(AttrValue::from("b")));
    assert_eq!(view.text(), "b");
}

#[test]
fn filter_links_follow_fragment() {
    let list = todo_list(Vec::new());
    let fragment = publisher(String::from("/"));
    let mount = Mount::new(&app(&list, &fragment.observe()).expect("valid page"));

    let selected = || {
        mount
            .find("a.selected")
            .map(|a| a.text())
            .unwrap_or_default()
    };
    assert_eq!(selected(), "All");
    fragment.set("/active".into());
    assert_eq!(selected(), "Active");
    fragment.set("/nowhere".into());
    assert_eq!(selected(), "");
}

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Toggle(usize),
    Remove(usize),
    ToggleAll(bool),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(Op::Add),
        (0usize..6).prop_map(Op::Toggle),
        (0usize..6).prop_map(Op::Remove),
        any::<bool>().prop_map(Op::ToggleAll),
        Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn mounted_page_matches_model(ops in prop::collection::vec(op(), 0..20)) {
        let list = todo_list(Vec::new());
        let mount = mount(&list);

        for op in ops {
            match op {
                Op::Add(text) => model::add_item(text, &list),
                Op::Toggle(index) => {
                    if let Some(item) = list.with(|items| items.get(index).cloned()) {
                        item.completed.set(!item.completed.get());
                    }
                }
                Op::Remove(index) => model::remove_item(index, &list),
                Op::ToggleAll(done) => model::set_all_completed(&list, done),
                Op::Clear => model::clear_completed(&list),
            }

            let (len, left) = list.with(|items| {
                (items.len(), items.iter().filter(|i| !i.is_completed()).count())
            });
            let noun = if left == 1 { "item" } else { "items" };
            prop_assert_eq!(count_text(&mount), format!("{left} {noun} left"));
            prop_assert_eq!(mount.find_all("input.toggle").len(), len);
            prop_assert_eq!(mount.find_all("li.completed").len(), len - left);

            let fresh = {
                let fragment = publisher(String::from("/"));
                Mount::new(&app(&list, &fragment.observe()).expect("valid page")).markup()
            };
            prop_assert_eq!(mount.markup(), fresh);
        }
    }
}
