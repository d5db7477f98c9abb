//! Interprets a `Layout` against a `Page`.
//!
//! # Design
//! An operation runs in two halves around the network call: `begin` reads the
//! bound inputs and builds the request, `complete` parses the response and
//! renders it. The host awaits the exchange in between, so the page is never
//! blocked and several operations may be in flight at once.
//!
//! Every request carries a sequence number. Only the most recently dispatched
//! request of each operation may render; an older response arriving late is
//! dropped instead of overwriting newer output.
//!
//! Failures stop here. They are rendered into the bound regions and handed
//! back to the host as data, never as a panic.

use std::collections::HashMap;

use crate::binding::{Binding, Layout, Operation, Output};
use crate::client::CustomerClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::page::{Content, CustomerTable, Page};
use crate::types::{Customer, CustomerId, CustomerInput, DeleteAck, SearchQuery};

pub const SUCCESS_MESSAGE: &str = "Success";
pub const SERVER_ERROR_MESSAGE: &str = "server error!";

/// Executes one `HttpRequest` for `Dispatcher::run`.
pub trait Transport {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// A dispatched request waiting for its response.
#[derive(Debug, Clone)]
pub struct Pending {
    seq: u64,
    operation: Operation,
    output: Output,
    id: Option<CustomerId>,
    request: HttpRequest,
}

impl Pending {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What `complete` did with a response.
#[derive(Debug)]
pub enum Applied {
    Success,
    Failure(ApiError),
    /// A newer request of the same operation was dispatched; nothing rendered.
    Stale,
}

#[derive(Debug)]
enum Parsed {
    Customers(Vec<Customer>),
    Deleted(DeleteAck),
}

pub struct Dispatcher {
    client: CustomerClient,
    layout: Layout,
    next_seq: u64,
    latest: HashMap<Operation, u64>,
}

impl Dispatcher {
    pub fn new(client: CustomerClient, layout: Layout) -> Self {
        Self {
            client,
            layout,
            next_seq: 1,
            latest: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Start the operation bound to `trigger`. Returns `None` for an unbound
    /// trigger. A request that cannot be built is rendered as a failure.
    pub fn begin(&mut self, trigger: &str, page: &mut dyn Page) -> Option<Result<Pending, ApiError>> {
        let binding = self.layout.by_trigger(trigger)?.clone();
        let id = binding.inputs.id.as_deref().map(|field| CustomerId::new(page.input(field)));

        let request = match self.build(&binding, id.as_ref(), page) {
            Ok(request) => request,
            Err(err) => {
                render_failure(page, &binding.output, &failure_message(binding.operation, &err, id.as_ref()));
                return Some(Err(err));
            }
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest.insert(binding.operation, seq);
        tracing::debug!(operation = ?binding.operation, seq, method = request.method.as_str(), path = %request.path, "dispatching");

        Some(Ok(Pending {
            seq,
            operation: binding.operation,
            output: binding.output,
            id,
            request,
        }))
    }

    /// Apply the outcome of a dispatched request to the page.
    pub fn complete(&mut self, pending: Pending, outcome: Result<HttpResponse, ApiError>, page: &mut dyn Page) -> Applied {
        if self.latest.get(&pending.operation) != Some(&pending.seq) {
            tracing::debug!(operation = ?pending.operation, seq = pending.seq, "discarding stale response");
            return Applied::Stale;
        }

        match outcome.and_then(|response| self.parse(pending.operation, response)) {
            Ok(Parsed::Customers(customers)) => {
                render_customers(page, &pending.output, &customers);
                Applied::Success
            }
            Ok(Parsed::Deleted(ack)) => {
                render_deleted(page, &pending.output, &ack);
                Applied::Success
            }
            Err(err) => {
                tracing::debug!(operation = ?pending.operation, seq = pending.seq, error = %err, "operation failed");
                let message = failure_message(pending.operation, &err, pending.id.as_ref());
                render_failure(page, &pending.output, &message);
                Applied::Failure(err)
            }
        }
    }

    /// `begin`, execute and `complete` in one step.
    pub fn run(&mut self, trigger: &str, page: &mut dyn Page, transport: &mut dyn Transport) -> Option<Applied> {
        let pending = match self.begin(trigger, page)? {
            Ok(pending) => pending,
            Err(err) => return Some(Applied::Failure(err)),
        };
        let outcome = transport.execute(pending.request());
        Some(self.complete(pending, outcome, page))
    }

    fn build(&self, binding: &Binding, id: Option<&CustomerId>, page: &dyn Page) -> Result<HttpRequest, ApiError> {
        let read = |field: &Option<String>| field.as_deref().map(|f| page.input(f)).unwrap_or_default();
        let input = || CustomerInput {
            firstname: read(&binding.inputs.firstname),
            lastname: read(&binding.inputs.lastname),
        };
        let blank = CustomerId::new("");
        let id = id.unwrap_or(&blank);

        match binding.operation {
            Operation::Create => self.client.build_create(&input()),
            Operation::Update => self.client.build_update(id, &input()),
            Operation::Retrieve => Ok(self.client.build_retrieve(id)),
            Operation::Delete => Ok(self.client.build_delete(id)),
            Operation::Search => {
                let query = SearchQuery::from_fields(&read(&binding.inputs.firstname), &read(&binding.inputs.lastname));
                Ok(self.client.build_search(&query))
            }
        }
    }

    fn parse(&self, operation: Operation, response: HttpResponse) -> Result<Parsed, ApiError> {
        Ok(match operation {
            Operation::Create => Parsed::Customers(vec![self.client.parse_create(response)?]),
            Operation::Update => Parsed::Customers(vec![self.client.parse_update(response)?]),
            Operation::Retrieve => Parsed::Customers(vec![self.client.parse_retrieve(response)?]),
            Operation::Delete => Parsed::Deleted(self.client.parse_delete(response)?),
            Operation::Search => Parsed::Customers(self.client.parse_search(response)?),
        })
    }
}

/// Message shown for a failed operation.
///
/// Update and retrieve name the missing id on 404. Everything else prefers
/// the server's message and falls back to a generic one.
pub fn failure_message(operation: Operation, err: &ApiError, id: Option<&CustomerId>) -> String {
    if err.is_not_found() && matches!(operation, Operation::Update | Operation::Retrieve) {
        return match id.filter(|id| !id.as_str().is_empty()) {
            Some(id) => format!("Customer id {id} does not exist"),
            None => "Customer does not exist".to_string(),
        };
    }
    err.server_message().unwrap_or(SERVER_ERROR_MESSAGE).to_string()
}

fn render_customers(page: &mut dyn Page, output: &Output, customers: &[Customer]) {
    match output {
        Output::Fields { id, name, message } => {
            page.clear(message);
            page.clear(id);
            page.clear(name);
            if let Some(customer) = customers.first() {
                page.render(id, Content::Text(customer.id.to_string()));
                page.render(name, Content::Text(customer.full_name()));
            }
        }
        Output::Table { table, flash } => {
            page.clear(table);
            page.render(table, Content::Table(CustomerTable::from_customers(customers)));
            page.render(flash, Content::Text(SUCCESS_MESSAGE.to_string()));
        }
        Output::Message { region } => {
            page.render(region, Content::Text(SUCCESS_MESSAGE.to_string()));
        }
    }
}

fn render_deleted(page: &mut dyn Page, output: &Output, ack: &DeleteAck) {
    let message = match &ack.id {
        Some(id) => format!("Customer with ID [{id}] has been Deleted!"),
        None => "Customer has been Deleted!".to_string(),
    };
    render_message(page, output, &message);
}

fn render_failure(page: &mut dyn Page, output: &Output, message: &str) {
    render_message(page, output, message);
}

/// Clear the result regions, then show `message`.
fn render_message(page: &mut dyn Page, output: &Output, message: &str) {
    let region = match output {
        Output::Fields { id, name, message: region } => {
            page.clear(id);
            page.clear(name);
            region
        }
        Output::Table { table, flash } => {
            page.clear(table);
            flash
        }
        Output::Message { region } => region,
    };
    page.clear(region);
    page.render(region, Content::Text(message.to_string()));
}
