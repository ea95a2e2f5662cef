//! Container name derivation from fully qualified names.

use phpoutline_lsp::container_name;

#[test]
fn static_member_access_drops_the_member() {
    assert_eq!(container_name("Foo\\Bar::baz"), "Foo\\Bar");
}

#[test]
fn instance_member_access_drops_the_member() {
    assert_eq!(container_name("Foo\\Bar->baz"), "Foo\\Bar");
}

#[test]
fn namespace_separator_drops_the_last_segment() {
    assert_eq!(container_name("Foo\\Bar\\Baz"), "Foo\\Bar");
}

#[test]
fn single_segment_yields_global_scope() {
    assert_eq!(container_name("baz"), "");
}

#[test]
fn mixed_separators_rejoin_with_the_namespace_separator() {
    assert_eq!(container_name("Foo\\Bar::baz()->qux"), "Foo\\Bar\\baz()");
}

#[test]
fn method_fqn_yields_the_class() {
    assert_eq!(container_name("App\\Models\\User::save()"), "App\\Models\\User");
}

#[test]
fn property_fqn_yields_the_class() {
    assert_eq!(container_name("App\\Models\\User::$name"), "App\\Models\\User");
}
