//! The five user actions the controller handles.

use orderapp_models::Order;

/// A user-triggered action. Each maps to exactly one controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Action {
    /// Bulk-insert the demo warehouse/product/customer records.
    AddRecords,
    /// Save the sample blogs and orders, then mark one order processed.
    CreateOrders,
    /// Delete the configured blog.
    DeleteBlog,
    /// Clear the local store and start it again.
    #[value(name = "clear")]
    ClearDataStore,
    /// Count stored blogs.
    #[value(name = "count")]
    TotalOrders,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::AddRecords,
        Action::CreateOrders,
        Action::DeleteBlog,
        Action::ClearDataStore,
        Action::TotalOrders,
    ];

    /// Label of the button that triggers this action.
    pub fn label(&self) -> &'static str {
        match self {
            Action::AddRecords => "Records",
            Action::CreateOrders => "Order",
            Action::DeleteBlog => "DisplayOrders",
            Action::ClearDataStore => "Clear Datastore",
            Action::TotalOrders => "Total orders",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tally of one `add_records` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddRecordsReport {
    pub saved: usize,
    pub failed: usize,
}

/// What a handled action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    RecordsAdded(AddRecordsReport),
    /// The order that was moved to `Processed`, if one was `InProcess`.
    OrdersCreated(Option<Order>),
    /// Whether a matching blog existed and was deleted.
    BlogDeleted(bool),
    Cleared,
    TotalOrders(usize),
}
