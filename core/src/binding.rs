//! Declarative bindings between page elements and API operations.
//!
//! # Design
//! A `Binding` says: when `trigger` fires, read `inputs`, run `operation`,
//! and render into `output`. A `Layout` is the full set of bindings for one
//! page. The dispatcher interprets bindings, so supporting a new page means
//! writing a layout, not new handlers. Layouts deserialize from JSON so a
//! host can ship its element ids as configuration.

use serde::Deserialize;

/// The five API operations a page can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Retrieve,
    Delete,
    Search,
}

/// Element ids of the input fields an operation reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Inputs {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// Where an operation's result and messages go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    /// Result id and "first last" name in two regions; errors go to `message`,
    /// which may be one of the two result regions.
    Fields { id: String, name: String, message: String },
    /// Result rows in a table region, status in a shared flash region.
    Table { table: String, flash: String },
    /// A single message region.
    Message { region: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Binding {
    pub trigger: String,
    pub operation: Operation,
    #[serde(default)]
    pub inputs: Inputs,
    pub output: Output,
}

/// All bindings of one page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Layout {
    pub bindings: Vec<Binding>,
}

impl Layout {
    pub fn by_trigger(&self, trigger: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.trigger == trigger)
    }

    pub fn by_operation(&self, operation: Operation) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.operation == operation)
    }

    /// The admin page: results as tables, status in `#flash_message`.
    /// Its retrieve id field is `#id_to_retrive`.
    pub fn panels() -> Self {
        let table = |name: &str| Output::Table {
            table: format!("{name}_results"),
            flash: "flash_message".to_string(),
        };
        Self {
            bindings: vec![
                binding("create-btn", Operation::Create, inputs(None, Some("first_name_to_create"), Some("last_name_to_create")), table("create")),
                binding("update-btn", Operation::Update, inputs(Some("id_to_update"), Some("first_name_to_update"), Some("last_name_to_update")), table("update")),
                binding("retrieve-btn", Operation::Retrieve, inputs(Some("id_to_retrive"), None, None), table("retrieve")),
                binding(
                    "delete-btn",
                    Operation::Delete,
                    inputs(Some("id_to_delete"), None, None),
                    Output::Message {
                        region: "flash_message".to_string(),
                    },
                ),
                binding("search-btn", Operation::Search, inputs(None, Some("first_name_to_search"), Some("last_name_to_search")), table("search")),
            ],
        }
    }

    /// The single-form page: id and name shown in per-operation result
    /// fields, errors written into the id field. Has no search form.
    ///
    /// The retrieve form's ids are spelled `retrive` in this page's markup.
    pub fn compact() -> Self {
        let fields = |name: &str| Output::Fields {
            id: format!("{name}_result_id"),
            name: format!("{name}_result_name"),
            message: format!("{name}_result_id"),
        };
        Self {
            bindings: vec![
                binding("create-btn", Operation::Create, inputs(None, Some("create_first_name"), Some("create_last_name")), fields("create")),
                binding("update-btn", Operation::Update, inputs(Some("update_id"), Some("update_first_name"), Some("update_last_name")), fields("update")),
                binding("retrive-btn", Operation::Retrieve, inputs(Some("retrive_id"), None, None), fields("retrive")),
                binding(
                    "delete-btn",
                    Operation::Delete,
                    inputs(Some("delete_id"), None, None),
                    Output::Message {
                        region: "delete_result".to_string(),
                    },
                ),
            ],
        }
    }
}

fn inputs(id: Option<&str>, firstname: Option<&str>, lastname: Option<&str>) -> Inputs {
    Inputs {
        id: id.map(str::to_string),
        firstname: firstname.map(str::to_string),
        lastname: lastname.map(str::to_string),
    }
}

fn binding(trigger: &str, operation: Operation, inputs: Inputs, output: Output) -> Binding {
    Binding {
        trigger: trigger.to_string(),
        operation,
        inputs,
        output,
    }
}
