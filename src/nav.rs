/// UI destinations the gating layer can route into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Checkout flow for a specific plan.
    Upgrade { plan: String },
    /// Plan comparison page.
    Plans,
}

/// Performs UI transitions. Only the overlay adapter's call-to-action
/// navigates; the resolver never does.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
