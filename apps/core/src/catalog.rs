use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::inventory::{desktop_id_for, ApplicationInventory, KnownApplication};
use crate::settings::parse_id_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Email,
    Chat,
    Microblog,
}

/// Email clients with dedicated compose/contacts actions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpecialClient {
    Thunderbird,
    Icedove,
    Kmail,
    Claws,
    Evolution,
    Geary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialActionKind {
    Compose,
    Contacts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialAction {
    pub kind: SpecialActionKind,
    pub command_line: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SpecialClientSpec {
    pub client: SpecialClient,
    pub token: &'static str,
    pub actions: &'static [SpecialAction],
}

const fn compose(command_line: &'static str) -> SpecialAction {
    SpecialAction {
        kind: SpecialActionKind::Compose,
        command_line,
    }
}

const fn contacts(command_line: &'static str) -> SpecialAction {
    SpecialAction {
        kind: SpecialActionKind::Contacts,
        command_line,
    }
}

/// Match table in priority order: an email identifier binds to the first entry
/// whose token it contains.
pub static SPECIAL_CLIENTS: [SpecialClientSpec; 6] = [
    SpecialClientSpec {
        client: SpecialClient::Thunderbird,
        token: "thunderbird",
        actions: &[
            compose("thunderbird -compose"),
            contacts("thunderbird -addressbook"),
        ],
    },
    SpecialClientSpec {
        client: SpecialClient::Icedove,
        token: "icedove",
        actions: &[compose("icedove -compose"), contacts("icedove -addressbook")],
    },
    SpecialClientSpec {
        client: SpecialClient::Kmail,
        token: "kmail",
        actions: &[compose("kmail -compose")],
    },
    SpecialClientSpec {
        client: SpecialClient::Claws,
        token: "claws",
        actions: &[compose("claws-mail --compose")],
    },
    SpecialClientSpec {
        client: SpecialClient::Evolution,
        token: "evolution",
        actions: &[compose("evolution mailto:"), contacts("evolution -c contacts")],
    },
    SpecialClientSpec {
        client: SpecialClient::Geary,
        token: "geary",
        actions: &[compose("geary mailto:")],
    },
];

impl SpecialClient {
    pub fn spec(self) -> &'static SpecialClientSpec {
        SPECIAL_CLIENTS
            .iter()
            .find(|spec| spec.client == self)
            .unwrap_or(&SPECIAL_CLIENTS[0])
    }

    pub fn match_identifier(identifier: &str) -> Option<Self> {
        let lower = identifier.to_lowercase();
        SPECIAL_CLIENTS
            .iter()
            .find(|spec| lower.contains(spec.token))
            .map(|spec| spec.client)
    }
}

/// Identifier lists as configured, one per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLists {
    pub email: Vec<String>,
    pub chat: Vec<String>,
    pub microblog: Vec<String>,
}

impl CategoryLists {
    pub fn parse(emails: &str, chats: &str, mblogs: &str) -> Self {
        Self {
            email: parse_id_list(emails),
            chat: parse_id_list(chats),
            microblog: parse_id_list(mblogs),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialBindings {
    slots: BTreeMap<SpecialClient, KnownApplication>,
}

impl SpecialBindings {
    pub fn get(&self, client: SpecialClient) -> Option<&KnownApplication> {
        self.slots.get(&client)
    }

    /// Binds `app` to `client`, returning the application previously bound there.
    pub fn bind(&mut self, client: SpecialClient, app: KnownApplication) -> Option<KnownApplication> {
        self.slots.insert(client, app)
    }

    /// Bound clients in match-table order.
    pub fn iter(&self) -> impl Iterator<Item = (SpecialClient, &KnownApplication)> {
        self.slots.iter().map(|(client, app)| (*client, app))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub generic_email: Vec<KnownApplication>,
    pub generic_chat: Vec<KnownApplication>,
    pub generic_microblog: Vec<KnownApplication>,
    pub special: SpecialBindings,
}

impl Catalog {
    pub fn build(lists: &CategoryLists, inventory: &dyn ApplicationInventory) -> Self {
        let mut catalog = Self::default();

        for identifier in &lists.email {
            let Some(app) = resolve(inventory, identifier) else {
                continue;
            };
            match SpecialClient::match_identifier(identifier) {
                Some(client) => {
                    if let Some(replaced) = catalog.special.bind(client, app) {
                        log::debug!(
                            "'{identifier}' replaces {} as the {client} binding",
                            replaced.id
                        );
                    }
                }
                None => catalog.generic_email.push(app),
            }
        }

        catalog.generic_chat = lists
            .chat
            .iter()
            .filter_map(|identifier| resolve(inventory, identifier))
            .collect();
        catalog.generic_microblog = lists
            .microblog
            .iter()
            .filter_map(|identifier| resolve(inventory, identifier))
            .collect();

        log::debug!(
            "catalog built: email={} chat={} microblog={} special={}",
            catalog.generic_email.len(),
            catalog.generic_chat.len(),
            catalog.generic_microblog.len(),
            catalog.special.len()
        );
        catalog
    }

    pub fn generic(&self, category: Category) -> &[KnownApplication] {
        match category {
            Category::Email => &self.generic_email,
            Category::Chat => &self.generic_chat,
            Category::Microblog => &self.generic_microblog,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.generic_email.is_empty()
            && self.generic_chat.is_empty()
            && self.generic_microblog.is_empty()
            && self.special.is_empty()
    }
}

fn resolve(inventory: &dyn ApplicationInventory, identifier: &str) -> Option<KnownApplication> {
    let app = inventory.lookup(&desktop_id_for(identifier));
    if app.is_none() {
        log::debug!("'{identifier}' is not installed");
    }
    app
}
