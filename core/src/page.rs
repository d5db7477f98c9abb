//! Render targets: the page the client reads inputs from and writes into.
//!
//! # Design
//! The client never touches a real DOM. It talks to a `Page`, which maps
//! element ids to input values and output regions. A browser shell
//! implements `Page` over the document; `MemoryPage` is the in-memory
//! version used by non-browser hosts and by tests.

use std::collections::HashMap;

use crate::types::Customer;

/// What a region displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Table(CustomerTable),
}

/// A set of element ids the client reads from and renders into.
pub trait Page {
    /// Current value of an input field. Missing fields read as empty.
    fn input(&self, id: &str) -> String;

    /// Replace the content of an output region.
    fn render(&mut self, id: &str, content: Content);

    /// Empty an output region.
    fn clear(&mut self, id: &str);
}

/// Customer rows with the fixed five-column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerTable {
    pub rows: Vec<[String; 5]>,
}

impl CustomerTable {
    pub const HEADER: [&'static str; 5] = ["ID", "First Name", "Last Name", "Credit Level", "Valid"];

    /// One row per customer, in the order given.
    pub fn from_customers(customers: &[Customer]) -> Self {
        let rows = customers
            .iter()
            .map(|c| {
                [
                    c.id.to_string(),
                    c.firstname.clone(),
                    c.lastname.clone(),
                    c.credit_level.map(|l| l.to_string()).unwrap_or_default(),
                    c.valid.map(|v| v.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        Self { rows }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<table class="table-striped"><tr>"#);
        for title in Self::HEADER {
            html.push_str(&format!("<th>{title}</th>"));
        }
        html.push_str("</tr>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// In-memory `Page`: input values and rendered regions keyed by element id.
#[derive(Debug, Default, Clone)]
pub struct MemoryPage {
    inputs: HashMap<String, String>,
    regions: HashMap<String, Content>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, id: &str, value: &str) {
        self.inputs.insert(id.to_string(), value.to_string());
    }

    pub fn content(&self, id: &str) -> Option<&Content> {
        self.regions.get(id)
    }

    /// Text of a region; empty when the region is cleared or holds a table.
    pub fn text(&self, id: &str) -> &str {
        match self.regions.get(id) {
            Some(Content::Text(text)) => text,
            _ => "",
        }
    }

    pub fn table(&self, id: &str) -> Option<&CustomerTable> {
        match self.regions.get(id) {
            Some(Content::Table(table)) => Some(table),
            _ => None,
        }
    }
}

impl Page for MemoryPage {
    fn input(&self, id: &str) -> String {
        self.inputs.get(id).cloned().unwrap_or_default()
    }

    fn render(&mut self, id: &str, content: Content) {
        self.regions.insert(id.to_string(), content);
    }

    fn clear(&mut self, id: &str) {
        self.regions.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomerId;

    fn customer(id: u64, first: &str, last: &str) -> Customer {
        Customer {
            id: CustomerId::from(id),
            firstname: first.to_string(),
            lastname: last.to_string(),
            credit_level: Some(2),
            valid: Some(true),
        }
    }

    #[test]
    fn table_rows_follow_input_order() {
        let table = CustomerTable::from_customers(&[customer(9, "Zed", "A"), customer(1, "Ann", "Lee")]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], ["9", "Zed", "A", "2", "true"].map(String::from));
        assert_eq!(table.rows[1][0], "1");
    }

    #[test]
    fn missing_server_fields_render_empty() {
        let mut c = customer(1, "Ann", "Lee");
        c.credit_level = None;
        c.valid = None;
        let table = CustomerTable::from_customers(&[c]);
        assert_eq!(table.rows[0][3], "");
        assert_eq!(table.rows[0][4], "");
    }

    #[test]
    fn empty_table_html_has_header_only() {
        let html = CustomerTable::from_customers(&[]).to_html();
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.contains("<th>Credit Level</th>"));
    }

    #[test]
    fn html_cells_are_escaped() {
        let html = CustomerTable::from_customers(&[customer(1, "<b>Ann</b>", "O'Lee")]).to_html();
        assert!(html.contains("<td>&lt;b&gt;Ann&lt;/b&gt;</td>"));
        assert!(html.contains("<td>O&#39;Lee</td>"));
    }

    #[test]
    fn memory_page_reads_missing_input_as_empty() {
        let mut page = MemoryPage::new();
        assert_eq!(page.input("nope"), "");
        page.set_input("first", "Ann");
        assert_eq!(page.input("first"), "Ann");
    }

    #[test]
    fn memory_page_clear_removes_region() {
        let mut page = MemoryPage::new();
        page.render("out", Content::Text("hi".to_string()));
        assert_eq!(page.text("out"), "hi");
        page.clear("out");
        assert!(page.content("out").is_none());
        assert_eq!(page.text("out"), "");
    }
}
