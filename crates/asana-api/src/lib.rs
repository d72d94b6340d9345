//! Typed client for the Asana REST API.
//!
//! [`Client`] owns the request pipeline: URL resolution below a fixed base, bearer auth,
//! the `{data, next_page, errors}` envelope, error classification and offset pagination.
//! The resource modules add one thin method per endpoint on top of it.

pub mod client;
pub mod error;
pub mod models;
pub mod options;
pub mod transport;

mod projects;
mod tags;
mod tasks;
mod time_tracking;
mod users;
mod workspaces;

pub use client::{Client, DEFAULT_BASE_URL, MAX_PAGE_SIZE, NextPage, Page, StaticToken, TokenProvider};
pub use error::{ApiError, ErrorDetail};
pub use models::{
    CreateTaskRequest, CreateTimeTrackingEntryRequest, CustomField, EnumOption, Membership,
    Project, Section, Tag, Task, Team, TimeTrackingEntry, UpdateTaskRequest, User, Workspace,
};
pub use options::{Feature, Options};
pub use tasks::{SearchTasksQuery, TaskQuery};
pub use transport::{
    DEFAULT_TIMEOUT, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport,
    TransportError,
};
