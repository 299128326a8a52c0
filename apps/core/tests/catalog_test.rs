use messaging_menu_core::catalog::{Catalog, Category, CategoryLists, SpecialClient};
use messaging_menu_core::inventory::{KnownApplication, StaticInventory};
use messaging_menu_core::notifier::{NotifierRegistry, NotifyFlags, SpecialNotifierPolicy};
use pretty_assertions::assert_eq;

fn mail_inventory() -> StaticInventory {
    StaticInventory::from_apps(vec![
        KnownApplication::new("thunderbird.desktop", "Thunderbird", "thunderbird %u"),
        KnownApplication::new("evolution.desktop", "Evolution", "evolution %U"),
        KnownApplication::new("mailspring.desktop", "Mailspring", "mailspring"),
        KnownApplication::new("pidgin.desktop", "Pidgin", "pidgin"),
        KnownApplication::new("dev.geopjr.Tuba.desktop", "Tuba", "dev.geopjr.Tuba"),
    ])
}

fn ids(apps: &[KnownApplication]) -> Vec<&str> {
    apps.iter().map(|app| app.id.as_str()).collect()
}

#[test]
fn empty_lists_produce_empty_catalog() {
    let catalog = Catalog::build(&CategoryLists::parse("", "", ""), &mail_inventory());
    assert!(catalog.is_empty());
    assert!(catalog.special.is_empty());
}

#[test]
fn special_clients_bind_and_leave_generic_email_empty() {
    let lists = CategoryLists::parse("thunderbird;evolution", "", "");
    let catalog = Catalog::build(&lists, &mail_inventory());

    assert_eq!(
        catalog.special.get(SpecialClient::Thunderbird).map(|a| a.id.as_str()),
        Some("thunderbird.desktop")
    );
    assert_eq!(
        catalog.special.get(SpecialClient::Evolution).map(|a| a.id.as_str()),
        Some("evolution.desktop")
    );
    assert!(catalog.generic(Category::Email).is_empty());
}

#[test]
fn uninstalled_identifiers_are_omitted() {
    let lists = CategoryLists::parse("mailspring;geary", "pidgin;hexchat", "tuba;dev.geopjr.Tuba");
    let catalog = Catalog::build(&lists, &mail_inventory());

    assert_eq!(ids(&catalog.generic_email), vec!["mailspring.desktop"]);
    assert_eq!(ids(&catalog.generic_chat), vec!["pidgin.desktop"]);
    assert_eq!(ids(&catalog.generic_microblog), vec!["dev.geopjr.Tuba.desktop"]);
    assert!(catalog.special.get(SpecialClient::Geary).is_none());
}

#[test]
fn later_identifier_replaces_earlier_special_binding() {
    let inventory = StaticInventory::from_apps(vec![
        KnownApplication::new("mozilla-thunderbird.desktop", "Thunderbird (legacy)", "thunderbird"),
        KnownApplication::new("thunderbird.desktop", "Thunderbird", "thunderbird"),
    ]);
    let catalog = Catalog::build(
        &CategoryLists::parse("mozilla-thunderbird;thunderbird", "", ""),
        &inventory,
    );
    assert_eq!(catalog.special.len(), 1);
    assert_eq!(
        catalog.special.get(SpecialClient::Thunderbird).map(|a| a.id.as_str()),
        Some("thunderbird.desktop")
    );
}

#[test]
fn special_identifier_matching_is_case_insensitive() {
    assert_eq!(
        SpecialClient::match_identifier("org.kde.KMail2"),
        Some(SpecialClient::Kmail)
    );
    assert_eq!(
        SpecialClient::match_identifier("claws-mail"),
        Some(SpecialClient::Claws)
    );
    assert_eq!(SpecialClient::match_identifier("mailspring"), None);
}

#[test]
fn registry_includes_special_clients_by_default() {
    let lists = CategoryLists::parse("thunderbird;mailspring", "pidgin", "dev.geopjr.Tuba");
    let catalog = Catalog::build(&lists, &mail_inventory());

    let registry = NotifierRegistry::build(
        &catalog,
        NotifyFlags::all(),
        SpecialNotifierPolicy::Include,
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(
        ids(registry.notifiers()),
        vec![
            "mailspring.desktop",
            "thunderbird.desktop",
            "pidgin.desktop",
            "dev.geopjr.Tuba.desktop"
        ]
    );
}

#[test]
fn registry_respects_flags_and_exclude_policy() {
    let lists = CategoryLists::parse("thunderbird;mailspring", "pidgin", "dev.geopjr.Tuba");
    let catalog = Catalog::build(&lists, &mail_inventory());

    let excluded = NotifierRegistry::build(
        &catalog,
        NotifyFlags::all(),
        SpecialNotifierPolicy::Exclude,
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(
        ids(excluded.notifiers()),
        vec!["mailspring.desktop", "pidgin.desktop", "dev.geopjr.Tuba.desktop"]
    );

    let chat_only = NotifierRegistry::build(
        &catalog,
        NotifyFlags {
            notify_email: false,
            notify_chat: true,
            notify_mblog: false,
        },
        SpecialNotifierPolicy::Include,
        vec!["Mailnag".to_string()],
        Vec::new(),
    );
    assert_eq!(ids(chat_only.notifiers()), vec!["pidgin.desktop"]);
    assert_eq!(chat_only.hidden_email().to_vec(), vec!["Mailnag".to_string()]);
}
