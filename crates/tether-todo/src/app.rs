#![forbid(unsafe_code)]

//! The complete todo page.

use tether_dom::{Element, Node, Result};
use tether_reactive::Observable;

use crate::model::TodoList;
use crate::view;

/// Placeholder of the entry field.
pub const PLACEHOLDER: &str = "What needs to be done?";

/// Filter routes, as `(href, label)`.
pub const FILTERS: [(&str, &str); 3] = [
    ("#/", "All"),
    ("#/active", "Active"),
    ("#/completed", "Completed"),
];

/// Build the page for `list`, highlighting the filter matching `fragment`.
pub fn app(list: &TodoList, fragment: &Observable<String>) -> Result<Element> {
    let header = view::todo_header(vec![
        view::h1("todos")?.into(),
        view::new_todo_item(PLACEHOLDER, list)?.into(),
    ])?;

    let mut main = view::toggle_all("Mark all as complete", list)?;
    main.push(view::todo_list(list)?.into());
    let main = view::main_section(main)?;

    let links = FILTERS
        .iter()
        .map(|(href, label)| view::link(href, label, fragment))
        .collect::<Result<Vec<_>>>()?;
    let footer = view::todo_footer(
        vec![
            view::todo_items_left(list)?.into(),
            view::todo_filters(links)?.into(),
            view::clear_button("Clear completed", list)?.into(),
        ],
        list,
    )?;

    let info = view::info_footer(vec![
        view::paragraph(vec![Node::from("Double-click to edit a todo")])?.into(),
        view::paragraph(vec![
            Node::from("Created by "),
            view::focus_link("https://github.com/garious", "Greg Fitzgerald")?.into(),
        ])?
        .into(),
        view::paragraph(vec![
            Node::from("Part of "),
            view::focus_link("http://todomvc.com", "TodoMVC")?.into(),
        ])?
        .into(),
    ])?;

    let page = view::container(
        vec![
            view::todo_section(vec![header.into(), main.into(), footer.into()])?.into(),
            info.into(),
        ],
        None,
        None,
    )?;
    tracing::debug!(message = "todo.app", items = list.with(Vec::len));
    Ok(page)
}
