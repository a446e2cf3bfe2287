//! Pager bar built on the component factory: prop types, prop-update hooks,
//! proxied methods, render caching and unmount behavior end to end.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ameliorate::component::{component_factory, ComponentDefinition, Host, HostEnv, Logic, RenderCx, UpdateCx};
use ameliorate::domain::{ComponentError, Element, Node, PropValue, Props, State};
use ameliorate::prop_types::{self, Diagnostics, PropTypeSpecs, PropTypes};
use ameliorate::proxy_methods;
use ameliorate::shared::{BuildMode, DirectAccess};
use ameliorate::style::{styles, StyleArg, StyleSheet, Theme};

struct PagerBar;

fn direction(props: &Props) -> String {
    props
        .value("direction")
        .as_str()
        .unwrap_or("horizontal")
        .to_lowercase()
}

impl PagerBar {
    fn on_tab_press(&mut self, cx: &mut UpdateCx<'_>, args: &[PropValue]) -> PropValue {
        let tab = args.first().cloned().unwrap_or_default();
        let tab_index = args.get(1).cloned().unwrap_or_default();
        let event = PropValue::object([("tab", tab.clone()), ("tabIndex", tab_index.clone())]);

        if let Some(on_press) = tab.get("onPress").and_then(PropValue::as_function) {
            if on_press.call(&[event.clone()]) == PropValue::Bool(false) {
                return PropValue::Bool(false);
            }
        }

        if cx.call_provided_callback("onTabPress", &[event]) == PropValue::Bool(false) {
            return PropValue::Bool(false);
        }

        cx.set_state(State::new().with("activeTab", tab_index));
        PropValue::Undefined
    }

    fn get_direction(&mut self, cx: &mut UpdateCx<'_>, _args: &[PropValue]) -> PropValue {
        PropValue::from(direction(cx.props()))
    }
}

impl Logic for PagerBar {
    proxy_methods!(on_tab_press, get_direction);

    fn on_prop_updated(&mut self, cx: &mut UpdateCx<'_>, name: &str, value: &PropValue) {
        if name == "activeTab" {
            cx.set_state(State::new().with("activeTab", value.clone()));
        }
    }

    fn resolve_props(&mut self, _cx: &mut UpdateCx<'_>, mut props: Props) -> Props {
        if let Some(tabs) = props.get("tabs").and_then(PropValue::as_function).cloned() {
            props.insert("tabs", tabs.call(&[]));
        }
        props
    }

    fn resolve_state(&mut self, cx: &mut UpdateCx<'_>, _initial: bool) -> State {
        State::new().with("activeTab", cx.get_state("activeTab", 0))
    }

    fn render(&self, cx: &RenderCx<'_>) -> Node {
        let direction = direction(cx.props());
        let active_tab = cx.get_state("activeTab", 0);
        let tabs = cx.prop("tabs");

        let buttons = tabs.as_array().unwrap_or_default().iter().enumerate().map(|(index, tab)| {
            let tab_index = PropValue::from(index);
            let active = active_tab == tab_index;
            let names = cx.generate_style_names(&direction, "tabButton", &[("active", active)]);
            let style = cx.style(&[
                StyleArg::from(names),
                StyleArg::from(cx.prop("tabStyle")),
                StyleArg::from(if active { cx.prop("activeTabStyle") } else { PropValue::Undefined }),
            ]);

            Node::from(
                Element::new("Button")
                    .key(index.to_string())
                    .prop("onPress", cx.bind("on_tab_press", vec![tab.clone(), tab_index]))
                    .prop("style", style)
                    .prop("caption", tab.get("caption").cloned().unwrap_or_default())
                    .prop("active", active),
            )
        });

        let container = cx.style(&[
            StyleArg::from("container"),
            StyleArg::from(cx.generate_style_names(&direction, "container", &[])),
            StyleArg::from(cx.prop("style")),
        ]);

        Element::new("View")
            .prop("style", container)
            .children(buttons)
            .into()
    }
}

fn pager_bar_styles() -> StyleSheet {
    StyleSheet::new(|theme| {
        styles([
            ("container", Props::new().with("flex", 0)),
            ("horizontalContainer", Props::new().with("flexDirection", "row")),
            ("verticalContainer", Props::new().with("flexDirection", "column")),
            (
                "tabButton",
                Props::new().with("backgroundColor", theme.get_or("MAIN_COLOR", "#ccc")),
            ),
            ("tabButtonActive", Props::new().with("backgroundColor", "#fff")),
            ("horizontalTabButtonActive", Props::new().with("borderBottomWidth", 2)),
        ])
    })
}

fn pager_bar() -> ComponentDefinition {
    component_factory("PagerBar", |_| PagerBar)
        .prop_types(
            PropTypeSpecs::new()
                .with("showIcons", prop_types::bool())
                .with("showCaptions", prop_types::bool())
                .with("direction", prop_types::string())
                .with("activeTab", prop_types::number())
                .with(
                    "tabs",
                    prop_types::one_of_type(vec![prop_types::array(), prop_types::func()]).is_required(),
                )
                .with("onTabPress", prop_types::func())
                .with("tabStyle", prop_types::any())
                .with("activeTabStyle", prop_types::any()),
        )
        .style_sheet(pager_bar_styles())
}

fn env() -> (HostEnv, Arc<Diagnostics>) {
    let diagnostics = Arc::new(Diagnostics::new());
    let prop_types = PropTypes::new(BuildMode::Development, DirectAccess::Throw, Arc::clone(&diagnostics));
    (HostEnv::new(prop_types, Theme::new("default").with("MAIN_COLOR", "#123")), diagnostics)
}

fn tabs() -> PropValue {
    PropValue::array(vec![
        PropValue::object([("caption", PropValue::from("Inbox"))]),
        PropValue::object([("caption", PropValue::from("Sent"))]),
        PropValue::object([("caption", PropValue::from("Drafts"))]),
    ])
}

fn buttons(host: &Host) -> Vec<Element> {
    host.output().find_all("Button").into_iter().cloned().collect()
}

fn active_captions(host: &Host) -> Vec<String> {
    buttons(host)
        .iter()
        .filter(|b| b.prop_values().value("active").is_truthy())
        .map(|b| b.prop_values().value("caption").to_js_string())
        .collect()
}

fn press(button: &Element) -> PropValue {
    button
        .prop_values()
        .value("onPress")
        .as_function()
        .map(|f| f.call(&[]))
        .unwrap_or_default()
}

#[test]
fn test_renders_tabs_with_styles() {
    let (env, diagnostics) = env();
    let mut host = Host::construct(&pager_bar(), Props::new().with("tabs", tabs()), &env).unwrap();
    host.mount().unwrap();

    let root = host.output().as_element().unwrap();
    assert_eq!(root.kind(), "View");
    assert_eq!(
        root.prop_values().value("style").get("flexDirection").map(PropValue::to_js_string),
        Some("row".to_string())
    );

    let buttons = buttons(&host);
    assert_eq!(buttons.len(), 3);
    assert_eq!(buttons[1].key_str(), Some("1"));
    assert_eq!(active_captions(&host), vec!["Inbox"]);

    let active_style = buttons[0].prop_values().value("style");
    assert_eq!(active_style.get("backgroundColor").map(PropValue::to_js_string), Some("#fff".to_string()));
    assert_eq!(active_style.get("borderBottomWidth").and_then(PropValue::as_number), Some(2.0));
    let idle_style = buttons[1].prop_values().value("style");
    assert_eq!(idle_style.get("backgroundColor").map(PropValue::to_js_string), Some("#123".to_string()));

    assert!(diagnostics.emitted().is_empty());
}

#[test]
fn test_pressing_a_tab_activates_it() {
    let (env, _) = env();
    let presses = Rc::new(RefCell::new(Vec::new()));
    let on_tab_press = {
        let presses = Rc::clone(&presses);
        PropValue::function(move |args| {
            let index = args[0].get("tabIndex").and_then(PropValue::as_number);
            presses.borrow_mut().push(index);
            PropValue::Undefined
        })
    };

    let mut host = Host::construct(
        &pager_bar(),
        Props::new().with("tabs", tabs()).with("onTabPress", on_tab_press),
        &env,
    )
    .unwrap();
    host.mount().unwrap();

    press(&buttons(&host)[2]);
    assert!(host.component().pending_state().is_some());
    assert!(host.flush().unwrap());

    assert_eq!(active_captions(&host), vec!["Drafts"]);
    assert_eq!(*presses.borrow(), vec![Some(2.0)]);
    assert_eq!(host.component().render_id().to_string(), "0/1");
}

#[test]
fn test_provided_callback_can_cancel() {
    let (env, _) = env();
    let mut host = Host::construct(
        &pager_bar(),
        Props::new()
            .with("tabs", tabs())
            .with("onTabPress", PropValue::function(|_| PropValue::Bool(false))),
        &env,
    )
    .unwrap();
    host.mount().unwrap();

    assert_eq!(press(&buttons(&host)[1]), PropValue::Bool(false));
    assert!(host.component().pending_state().is_none());
    assert!(!host.flush().unwrap());
    assert_eq!(active_captions(&host), vec!["Inbox"]);
}

#[test]
fn test_tab_on_press_can_cancel() {
    let (env, _) = env();
    let tabs = PropValue::array(vec![
        PropValue::object([("caption", PropValue::from("Home"))]),
        PropValue::object([
            ("caption", PropValue::from("Locked")),
            ("onPress", PropValue::function(|_| PropValue::Bool(false))),
        ]),
    ]);
    let mut host = Host::construct(&pager_bar(), Props::new().with("tabs", tabs), &env).unwrap();
    host.mount().unwrap();

    press(&buttons(&host)[1]);
    assert!(!host.flush().unwrap());
    assert_eq!(active_captions(&host), vec!["Home"]);
}

#[test]
fn test_active_tab_prop_updates_state() {
    let (env, _) = env();
    let tabs = tabs();
    let mut host = Host::construct(
        &pager_bar(),
        Props::new().with("tabs", tabs.clone()).with("activeTab", 1),
        &env,
    )
    .unwrap();
    host.mount().unwrap();
    assert_eq!(active_captions(&host), vec!["Sent"]);

    assert!(host
        .update(Props::new().with("tabs", tabs.clone()).with("activeTab", 2))
        .unwrap());
    assert_eq!(active_captions(&host), vec!["Drafts"]);
    assert_eq!(host.component().render_id().to_string(), "1/0");

    // Same tabs array by identity and same activeTab: nothing to do
    assert!(!host
        .update(Props::new().with("tabs", tabs).with("activeTab", 2))
        .unwrap());
}

#[test]
fn test_tabs_function_is_resolved() {
    let (env, diagnostics) = env();
    let mut host = Host::construct(
        &pager_bar(),
        Props::new().with("tabs", PropValue::function(|_| tabs())),
        &env,
    )
    .unwrap();
    host.mount().unwrap();

    assert_eq!(buttons(&host).len(), 3);
    assert!(host.component().resolved_props().value("tabs").as_array().is_some());
    assert!(diagnostics.emitted().is_empty());
}

#[test]
fn test_missing_tabs_is_reported_once() {
    let (env, diagnostics) = env();
    for _ in 0..2 {
        let host = Host::construct(&pager_bar(), Props::new().with("direction", "vertical"), &env).unwrap();
        assert_eq!(host.component().prop_type_failures().len(), 1);
    }

    assert_eq!(
        diagnostics.emitted(),
        vec![
            "Warning: Failed prop type: The prop `tabs` is marked as required in `PagerBar`, but its value is `undefined`."
                .to_string()
        ]
    );
}

#[test]
fn test_invalid_tabs_type_is_reported() {
    let (env, diagnostics) = env();
    let host = Host::construct(&pager_bar(), Props::new().with("tabs", "inbox"), &env).unwrap();

    assert_eq!(
        host.component().prop_type_failures()[0].message(),
        "Invalid prop `tabs` supplied to `PagerBar`."
    );
    assert_eq!(diagnostics.seen_count(), 1);
}

#[test]
fn test_proxied_direction_method() {
    let (env, _) = env();
    let mut host = Host::construct(
        &pager_bar(),
        Props::new().with("tabs", tabs()).with("direction", "Vertical"),
        &env,
    )
    .unwrap();
    host.mount().unwrap();

    assert_eq!(host.dispatch("get_direction", &[]).unwrap().as_str(), Some("vertical"));
    assert!(matches!(
        host.component().call("render", &[]),
        Err(ComponentError::UnknownMethod { .. })
    ));
    assert_eq!(host.component().proxied_methods(), vec!["on_tab_press", "get_direction"]);
}

#[test]
fn test_press_after_unmount_is_noop() {
    let (env, _) = env();
    let mut host = Host::construct(&pager_bar(), Props::new().with("tabs", tabs()), &env).unwrap();
    host.mount().unwrap();
    let stale = buttons(&host);

    host.unmount().unwrap();

    assert_eq!(press(&stale[2]), PropValue::Undefined);
    assert!(host.component().pending_state().is_none());
    assert_eq!(host.component().state().value("activeTab").as_number(), Some(0.0));
    assert!(host.flush().is_err());
}

#[test]
fn test_render_interceptor_wraps_output() {
    let (env, _) = env();
    let mut host = Host::construct(&pager_bar(), Props::new().with("tabs", tabs()), &env).unwrap();
    host.component().intercept_render(|cx, node| {
        Element::new("Tooltip")
            .prop("renderId", cx.render_id().to_string())
            .child(node)
            .into()
    });
    host.mount().unwrap();

    let root = host.output().as_element().unwrap();
    assert_eq!(root.kind(), "Tooltip");
    assert_eq!(root.prop_values().value("renderId").as_str(), Some("0/0"));
    assert_eq!(buttons(&host).len(), 3);
}
