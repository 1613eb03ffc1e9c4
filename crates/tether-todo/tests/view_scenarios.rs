#![forbid(unsafe_code)]

//! Widget behavior on bare element descriptions: props are read through
//! their observables and handlers are triggered directly.

use tether_dom::{AttrValue, Element, Event, Node};
use tether_reactive::publisher;
use tether_todo::model::{TodoItem, TodoList, todo_list};
use tether_todo::view;

fn text(node: &Node) -> String {
    node.text_content()
}

fn items_left(nodes: &[Node]) -> String {
    nodes.iter().map(text).collect()
}

fn item_texts(list: &TodoList) -> Vec<String> {
    list.with(|items| items.iter().map(|item| item.text.get()).collect())
}

/// `li` → (`div.view`, `input.edit`).
fn row_parts(row: &Element) -> (Element, Element) {
    (
        row.child(0).expect("read-mode view"),
        row.child(1).expect("write-mode input"),
    )
}

#[test]
fn focus_link_select_and_blur() {
    let link = view::focus_link("a.b.c", "A").expect("valid");
    assert_eq!(link.attr_value("class"), Some(AttrValue::Unset));

    assert!(link.trigger("select", &mut Event::click()));
    assert_eq!(link.attr_value("class"), Some(AttrValue::from("selected")));

    assert!(link.trigger("blur", &mut Event::click()));
    assert_eq!(link.attr_value("class"), Some(AttrValue::Unset));
}

#[test]
fn filter_link_follows_fragment() {
    let fragment = publisher(String::from("foo"));
    let link = view::link("#a.b.c", "A", &fragment.observe()).expect("valid");
    assert_eq!(link.attr_value("class"), Some(AttrValue::from("")));

    fragment.set("a.b.c".into());
    assert_eq!(link.attr_value("class"), Some(AttrValue::from("selected")));

    fragment.set("bar".into());
    assert_eq!(link.attr_value("class"), Some(AttrValue::from("")));
    assert_eq!(link.text_content(), "A");
}

#[test]
fn double_click_enters_edit_mode() {
    let list = todo_list(Vec::new());
    let item = TodoItem::new("foo");
    let row = view::todo_item(&list, &item, 0).expect("valid");
    let (read, write) = row_parts(&row);

    let label = read.child(1).expect("label");
    assert_eq!(label.name(), "label");
    let contents = label.children();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].as_text(), Some("foo"));

    assert_eq!(read.style_value("display").as_deref(), Some("block"));
    assert_eq!(write.style_value("display").as_deref(), Some("none"));

    assert!(read.trigger("dblclick", &mut Event::click()));
    assert_eq!(read.style_value("display").as_deref(), Some("none"));
    assert_eq!(write.style_value("display").as_deref(), Some("block"));

    assert!(write.trigger("change", &mut Event::change("bar")));
    assert_eq!(read.style_value("display").as_deref(), Some("block"));
    assert_eq!(write.style_value("display").as_deref(), Some("none"));
    assert_eq!(item.text.get(), "bar");
    assert_eq!(label.text_content(), "bar");
}

#[test]
fn blank_edit_removes_item() {
    let item = TodoItem::new("a");
    let list = todo_list(vec![item.clone(), TodoItem::new("b")]);
    let row = view::todo_item(&list, &item, 0).expect("valid");
    let (read, write) = row_parts(&row);

    read.trigger("dblclick", &mut Event::click());
    write.trigger("change", &mut Event::change("   "));
    assert_eq!(item_texts(&list), ["b"]);
    assert_eq!(read.style_value("display").as_deref(), Some("block"));
}

#[test]
fn edit_trims_text() {
    let item = TodoItem::new("a");
    let list = todo_list(vec![item.clone()]);
    let row = view::todo_item(&list, &item, 0).expect("valid");
    let (_, write) = row_parts(&row);

    write.trigger("change", &mut Event::change("  c  "));
    assert_eq!(item.text.get(), "c");
    assert_eq!(write.attr_value("value"), Some(AttrValue::from("c")));
}

#[test]
fn item_checkbox_toggles_completion() {
    let list = todo_list(Vec::new());
    let item = TodoItem::new("a");
    let row = view::todo_item(&list, &item, 0).expect("valid");
    let (read, _) = row_parts(&row);
    let checkbox = read.child(0).expect("toggle");

    assert_eq!(checkbox.attr_value("checked"), Some(AttrValue::Unset));

    checkbox.trigger("click", &mut Event::click());
    assert_eq!(checkbox.attr_value("checked"), Some(AttrValue::Bool(true)));
    assert!(item.completed.get());

    checkbox.trigger("click", &mut Event::click());
    assert_eq!(checkbox.attr_value("checked"), Some(AttrValue::Unset));
}

#[test]
fn item_class_follows_completion() {
    let list = todo_list(Vec::new());
    let open = view::todo_item(&list, &TodoItem::new("a"), 0).expect("valid");
    assert_eq!(open.attr_value("class"), Some(AttrValue::from("")));

    let done = view::todo_item(&list, &TodoItem::done("a"), 0).expect("valid");
    assert_eq!(done.attr_value("class"), Some(AttrValue::from("completed")));
}

#[test]
fn todo_list_renders_current_items() {
    let list = todo_list(Vec::new());
    let ul = view::todo_list(&list).expect("valid");
    assert!(ul.children().is_empty());

    list.set(vec![TodoItem::new("a")]);
    let row = ul.child(0).expect("row");
    assert_eq!(row.name(), "li");
    assert_eq!(row.attr_value("class"), Some(AttrValue::from("")));
}

#[test]
fn items_left_contents_pluralizes() {
    let left = |flags: Vec<bool>| {
        let flags: Vec<_> = flags.into_iter().map(|f| publisher(f).observe()).collect();
        items_left(&view::todo_items_left_contents(&flags).expect("valid"))
    };
    assert_eq!(left(vec![]), "0 items left");
    assert_eq!(left(vec![true]), "0 items left");
    assert_eq!(left(vec![false]), "1 item left");
    assert_eq!(left(vec![false, false]), "2 items left");
}

#[test]
fn items_left_tracks_list_and_items() {
    let list = todo_list(Vec::new());
    let span = view::todo_items_left(&list).expect("valid");
    assert_eq!(span.text_content(), "0 items left");

    let item = TodoItem::new("a");
    list.set(vec![item.clone()]);
    assert_eq!(span.text_content(), "1 item left");

    item.completed.set(true);
    assert_eq!(span.text_content(), "0 items left");

    item.completed.set(false);
    assert_eq!(span.text_content(), "1 item left");
}

#[test]
fn items_left_count_element_is_built_once() {
    let item = TodoItem::new("a");
    let list = todo_list(vec![item.clone()]);
    let span = view::todo_items_left(&list).expect("valid");
    let count = span.child(0).expect("strong");
    assert_eq!(count.name(), "strong");
    assert_eq!(count.text_content(), "1");

    list.set(vec![item.clone(), TodoItem::new("b")]);
    item.completed.set(true);
    let after = span.child(0).expect("strong");
    assert!(after.ptr_eq(&count));
    assert_eq!(span.text_content(), "1 item left");
}

#[test]
fn todo_list_rows_follow_every_list_change() {
    let list = todo_list(vec![TodoItem::new("a"), TodoItem::done("b")]);
    let ul = view::todo_list(&list).expect("valid");
    assert_eq!(ul.children().len(), 2);

    list.update(|items| items.push(TodoItem::new("c")));
    let classes: Vec<_> = (0..3)
        .map(|i| ul.child(i).and_then(|row| row.attr_value("class")))
        .collect();
    assert_eq!(
        classes,
        [
            Some(AttrValue::from("")),
            Some(AttrValue::from("completed")),
            Some(AttrValue::from("")),
        ]
    );
}

#[test]
fn new_item_requires_enter_and_text() {
    let list = todo_list(Vec::new());
    let input = view::new_todo_item("baz", &list).expect("valid");

    input.trigger("keyup", &mut Event::key_up(10, "bar"));
    assert!(list.with(Vec::is_empty));

    let mut event = Event::key_up(13, "bar");
    input.trigger("keyup", &mut event);
    assert_eq!(item_texts(&list), ["bar"]);
    assert_eq!(event.value(), "");

    input.trigger("keyup", &mut Event::key_up(13, "  baz\t"));
    assert_eq!(item_texts(&list), ["bar", "baz"]);

    let mut blank = Event::key_up(13, "  ");
    input.trigger("keyup", &mut blank);
    assert_eq!(item_texts(&list), ["bar", "baz"]);
    assert_eq!(blank.value(), "  ");
}

#[test]
fn destroy_button_removes_item() {
    let item = TodoItem::new("a");
    let list = todo_list(vec![item.clone()]);
    let row = view::todo_item(&list, &item, 0).expect("valid");
    let (read, _) = row_parts(&row);
    let destroy = read.child(2).expect("destroy");
    assert_eq!(destroy.attr_value("class"), Some(AttrValue::from("destroy")));

    destroy.trigger("click", &mut Event::click());
    assert!(list.with(Vec::is_empty));
}

#[test]
fn toggle_all_sets_every_item() {
    let item = TodoItem::new("a");
    let list = todo_list(vec![item.clone()]);
    let checkbox = view::toggle_all_checkbox(&list).expect("valid");

    assert_eq!(checkbox.style_value("display").as_deref(), Some("block"));
    assert_eq!(checkbox.attr_value("checked"), Some(AttrValue::Unset));

    checkbox.trigger("click", &mut Event::checked(true));
    assert!(item.completed.get());

    checkbox.trigger("click", &mut Event::checked(false));
    assert!(!item.completed.get());

    item.completed.set(true);
    checkbox.trigger("click", &mut Event::click());
    assert!(!item.completed.get(), "missing checked state reads as false");

    item.completed.set(true);
    assert_eq!(checkbox.attr_value("checked"), Some(AttrValue::Bool(true)));

    list.set(Vec::new());
    assert_eq!(checkbox.style_value("display").as_deref(), Some("none"));
    assert_eq!(checkbox.attr_value("checked"), Some(AttrValue::Unset));
}

#[test]
fn toggle_all_label_points_at_checkbox() {
    let list = todo_list(Vec::new());
    let nodes = view::toggle_all("Mark all as complete", &list).expect("valid");
    assert_eq!(nodes.len(), 2);
    let label = nodes[1].as_element().expect("label");
    assert_eq!(label.attr_value("for"), Some(AttrValue::from("toggle-all")));
    assert_eq!(label.text_content(), "Mark all as complete");
}

#[test]
fn clear_button_visibility_and_click() {
    let list = todo_list(vec![
        TodoItem::done("a"),
        TodoItem::new("b"),
        TodoItem::done("c"),
    ]);
    let button = view::clear_button("foo", &list).expect("valid");
    assert_eq!(button.style_value("visibility").as_deref(), Some("visible"));

    button.trigger("click", &mut Event::click());
    assert_eq!(item_texts(&list), ["b"]);
    assert_eq!(button.style_value("visibility").as_deref(), Some("hidden"));
}

#[test]
fn footer_hidden_for_empty_list() {
    let list = todo_list(Vec::new());
    let footer = view::todo_footer(Vec::new(), &list).expect("valid");
    assert_eq!(footer.style_value("display").as_deref(), Some("none"));

    list.set(vec![TodoItem::new("a")]);
    assert_eq!(footer.style_value("display").as_deref(), Some("block"));
}
