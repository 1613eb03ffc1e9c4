#![forbid(unsafe_code)]

//! Todo widgets.
//!
//! Every widget takes the list cell explicitly and returns an element
//! description; nothing here renders or subscribes. Reactive props are
//! derived views or subscribers over the list and its items, and handlers
//! mutate the list through [`crate::model`].

use tether_dom::{AttrValue, ENTER_KEY, Element, Node, Prop, Result};
use tether_reactive::{Dependency, Observable, publisher, subscriber};

use crate::model::{self, TodoItem, TodoList};

// ---------------------------------------------------------------------------
// Value mappers
// ---------------------------------------------------------------------------

/// `block` when shown, `none` otherwise.
fn display_style(shown: bool) -> String {
    (if shown { "block" } else { "none" }).to_owned()
}

/// A checked box renders a bare `checked`; an unchecked one omits it.
fn checked_attr(checked: bool) -> AttrValue {
    if checked {
        AttrValue::Bool(true)
    } else {
        AttrValue::Unset
    }
}

fn completed_class(completed: bool) -> String {
    (if completed { "completed" } else { "" }).to_owned()
}

fn nodes(elements: impl IntoIterator<Item = Element>) -> Vec<Node> {
    elements.into_iter().map(Node::from).collect()
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// A `name` element (default `div`) with optional class.
pub fn container(
    contents: impl Into<Prop<Vec<Node>>>,
    name: Option<&str>,
    class: Option<&str>,
) -> Result<Element> {
    let mut builder = Element::builder(name.unwrap_or(tether_dom::DEFAULT_TAG)).contents(contents);
    if let Some(class) = class {
        builder = builder.attr("class", class);
    }
    builder.build()
}

pub fn h1(text: &str) -> Result<Element> {
    container(vec![Node::from(text)], Some("h1"), None)
}

pub fn paragraph(contents: Vec<Node>) -> Result<Element> {
    container(contents, Some("p"), None)
}

pub fn list_item(contents: Vec<Node>) -> Result<Element> {
    container(contents, Some("li"), None)
}

pub fn todo_header(contents: Vec<Node>) -> Result<Element> {
    container(contents, Some("header"), Some("header"))
}

pub fn main_section(contents: Vec<Node>) -> Result<Element> {
    container(contents, Some("section"), Some("main"))
}

pub fn todo_section(contents: Vec<Node>) -> Result<Element> {
    container(contents, Some("section"), Some("todoapp"))
}

pub fn info_footer(contents: Vec<Node>) -> Result<Element> {
    container(contents, Some("footer"), Some("info"))
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Filter link: class `selected` while `fragment` equals `href` without its
/// leading `#`, empty otherwise.
pub fn link(href: &str, text: &str, fragment: &Observable<String>) -> Result<Element> {
    let target = href.strip_prefix('#').unwrap_or(href).to_owned();
    let class = fragment.map(move |current| {
        if *current == target {
            "selected".to_owned()
        } else {
            String::new()
        }
    });
    Element::builder("a")
        .attr("class", class)
        .attr("href", href)
        .child(text)
        .build()
}

/// Link selected by its own `select` and `blur` events.
pub fn focus_link(href: &str, text: &str) -> Result<Element> {
    let class = publisher(AttrValue::Unset);
    let (on_select, on_blur) = (class.clone(), class.clone());
    Element::builder("a")
        .attr("class", class.observe())
        .attr("href", href)
        .child(text)
        .on("select", move |_| on_select.set("selected".into()))
        .on("blur", move |_| on_blur.set(AttrValue::Unset))
        .build()
}

/// `ul.filters` with one `li` per link.
pub fn todo_filters(links: Vec<Element>) -> Result<Element> {
    let items = links
        .into_iter()
        .map(|link| list_item(vec![Node::from(link)]))
        .collect::<Result<Vec<_>>>()?;
    container(nodes(items), Some("ul"), Some("filters"))
}

// ---------------------------------------------------------------------------
// Toggle-all
// ---------------------------------------------------------------------------

/// Checkbox completing or reopening every item.
///
/// Shown while the list is non-empty; checked while every item is
/// completed. A click copies the payload's checked state (missing reads as
/// `false`) onto every item.
pub fn toggle_all_checkbox(list: &TodoList) -> Result<Element> {
    let flags = model::completed_flags(list);
    let reader = flags.clone();
    let all_completed = subscriber([Dependency::each(&flags)], move || {
        reader.with(|flags| !flags.is_empty() && flags.iter().all(Observable::get))
    });

    let writer = list.clone();
    Element::builder("input")
        .attr("id", "toggle-all")
        .attr("class", "toggle-all")
        .attr("type", "checkbox")
        .attr("checked", all_completed.map(|all| checked_attr(*all)))
        .style("display", list.map(|items| display_style(!items.is_empty())))
        .on("click", move |event| {
            model::set_all_completed(&writer, event.is_checked());
        })
        .build()
}

/// The toggle-all checkbox followed by its label.
pub fn toggle_all(text: &str, list: &TodoList) -> Result<Vec<Node>> {
    let label = Element::builder("label")
        .attr("for", "toggle-all")
        .child(text)
        .build()?;
    Ok(nodes([toggle_all_checkbox(list)?, label]))
}

// ---------------------------------------------------------------------------
// Items left
// ---------------------------------------------------------------------------

fn incomplete(flags: &[Observable<bool>]) -> usize {
    flags.iter().filter(|flag| !flag.get()).count()
}

fn items_left_suffix(left: usize) -> &'static str {
    if left == 1 { " item left" } else { " items left" }
}

/// `[<strong>N</strong>, " item(s) left"]` for the incomplete flags.
pub fn todo_items_left_contents(flags: &[Observable<bool>]) -> Result<Vec<Node>> {
    let left = incomplete(flags);
    let count = Element::builder("strong").child(left.to_string()).build()?;
    Ok(vec![Node::from(count), Node::from(items_left_suffix(left))])
}

/// `span.todo-count` recomputed whenever the list or any item's completion
/// flag changes.
///
/// The `strong` is built once; only its text and the suffix follow the count.
pub fn todo_items_left(list: &TodoList) -> Result<Element> {
    let flags = model::completed_flags(list);
    let reader = flags.clone();
    let left = subscriber([Dependency::each(&flags)], move || {
        reader.with(|flags| incomplete(flags))
    });
    let count = Element::builder("strong")
        .reactive_contents(left.map(|left| vec![Node::from(left.to_string())]))
        .build()?;
    let contents = left.map(move |left| {
        vec![Node::from(count.clone()), Node::from(items_left_suffix(*left))]
    });
    container(contents, Some("span"), Some("todo-count"))
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// Input appending a trimmed item on Enter and clearing itself.
pub fn new_todo_item(placeholder: &str, list: &TodoList) -> Result<Element> {
    let writer = list.clone();
    Element::builder("input")
        .attr("class", "new-todo")
        .attr("placeholder", placeholder)
        .attr("autofocus", true)
        .on("keyup", move |event| {
            let text = event.value().trim().to_owned();
            if event.key_code == Some(ENTER_KEY) && !text.is_empty() {
                model::add_item(text, &writer);
                event.target.value = Some(String::new());
            }
        })
        .build()
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Per-item state shared by the read and write halves of a row.
#[derive(Clone)]
struct ItemState {
    list: TodoList,
    item: TodoItem,
    index: usize,
    read_mode: tether_reactive::Publisher<bool>,
}

/// `div.view`: toggle, label and destroy button. Double-click switches to
/// edit mode.
fn read_mode_item(state: &ItemState) -> Result<Element> {
    let toggle = {
        let completed = state.item.completed.clone();
        Element::builder("input")
            .attr("class", "toggle")
            .attr("type", "checkbox")
            .attr("checked", state.item.completed.map(|done| checked_attr(*done)))
            .on("click", move |_| completed.set(!completed.get()))
            .build()?
    };
    let label = Element::builder("label")
        .reactive_contents(state.item.text.map(|text| vec![Node::from(text.as_str())]))
        .build()?;
    let destroy = {
        let (list, index) = (state.list.clone(), state.index);
        Element::builder("button")
            .attr("class", "destroy")
            .on("click", move |_| model::remove_item(index, &list))
            .build()?
    };

    let read_mode = state.read_mode.clone();
    Element::builder("div")
        .attr("class", "view")
        .style("display", state.read_mode.map(|read| display_style(*read)))
        .contents(nodes([toggle, label, destroy]))
        .on("dblclick", move |_| read_mode.set(false))
        .build()
}

/// `input.edit`: commits on change. Blank text removes the item.
fn write_mode_item(state: &ItemState) -> Result<Element> {
    let handler_state = state.clone();
    Element::builder("input")
        .attr("class", "edit")
        .attr("value", state.item.text.observe())
        .style("display", state.read_mode.map(|read| display_style(!*read)))
        .on("change", move |event| {
            let text = event.value().trim();
            if text.is_empty() {
                model::remove_item(handler_state.index, &handler_state.list);
            } else {
                handler_state.item.text.set(text.to_owned());
            }
            handler_state.read_mode.set(true);
        })
        .build()
}

/// One `li` row. Its class is `completed` or empty.
pub fn todo_item(list: &TodoList, item: &TodoItem, index: usize) -> Result<Element> {
    let state = ItemState {
        list: list.clone(),
        item: item.clone(),
        index,
        read_mode: publisher(true),
    };
    Element::builder("li")
        .attr("class", item.completed.map(|done| completed_class(*done)))
        .contents(nodes([read_mode_item(&state)?, write_mode_item(&state)?]))
        .build()
}

fn todo_rows(list: &TodoList, items: &[TodoItem]) -> Result<Vec<Node>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| todo_item(list, item, index).map(Node::from))
        .collect()
}

/// `ul.todo-list` re-rendered whenever the list changes.
///
/// The initial rows are built eagerly so a malformed row is reported here.
///
/// # Panics
///
/// A row that fails to build during a later list change panics inside the
/// triggering `set`, like any other failing transform.
pub fn todo_list(list: &TodoList) -> Result<Element> {
    list.with(|items| todo_rows(list, items))?;
    let owner = list.clone();
    let rows = list.map(move |items| match todo_rows(&owner, items) {
        Ok(rows) => rows,
        Err(error) => panic!("todo row failed to build: {error}"),
    });
    container(rows, Some("ul"), Some("todo-list"))
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

/// Button clearing completed items; visible while any item is completed.
pub fn clear_button(text: &str, list: &TodoList) -> Result<Element> {
    let flags = model::completed_flags(list);
    let reader = flags.clone();
    let any_completed = subscriber([Dependency::each(&flags)], move || {
        reader.with(|flags| flags.iter().any(Observable::get))
    });

    let writer = list.clone();
    Element::builder("button")
        .attr("class", "clear-completed")
        .style(
            "visibility",
            any_completed.map(|any| (if *any { "visible" } else { "hidden" }).to_owned()),
        )
        .child(text)
        .on("click", move |_| model::clear_completed(&writer))
        .build()
}

/// `footer.footer`, hidden while the list is empty.
pub fn todo_footer(contents: Vec<Node>, list: &TodoList) -> Result<Element> {
    Element::builder("footer")
        .attr("class", "footer")
        .style("display", list.map(|items| display_style(!items.is_empty())))
        .contents(contents)
        .build()
}
