use super::context::{RequestContext, RequestType};

/// Edit step of the money request flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Amount,
    Description,
    Distance,
    Merchant,
    Date,
    Category,
    Tag(usize),
    TaxRate,
    TaxAmount,
    Scan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Step {
        step: Step,
        request_type: RequestType,
        transaction_id: String,
        report_id: String,
    },
    EditSplitBill {
        report_id: String,
        report_action_id: String,
        step: Step,
    },
    Profile {
        account_id: u64,
    },
    ReportDetails {
        report_id: String,
    },
}

impl Destination {
    pub fn step(step: Step, context: &RequestContext, transaction_id: &str) -> Self {
        Destination::Step {
            step,
            request_type: context.request_type,
            transaction_id: transaction_id.to_string(),
            report_id: context.report_id.clone(),
        }
    }
}

/// Routing surface of the host application. Calls are never awaited.
pub trait Navigator {
    fn navigate(&mut self, destination: Destination);

    /// Pop the current screen, landing on `fallback` when there is no history.
    fn go_back(&mut self, fallback: Destination);
}

/// Records destinations in order.
impl Navigator for Vec<Destination> {
    fn navigate(&mut self, destination: Destination) {
        self.push(destination);
    }

    fn go_back(&mut self, fallback: Destination) {
        self.push(fallback);
    }
}
