//! Feature flags toggled from the hosted backend's admin area.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    CommissionTracking,
    PremiumListings,
    SupplierAnalytics,
    QuoteRequests,
    ReviewsSystem,
    AiComparison,
    LocationFiltering,
    EmailNotifications,
}

impl FeatureFlag {
    /// Identifier used by the backend's `/api/feature-flags/{id}` endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureFlag::CommissionTracking => "commission_tracking",
            FeatureFlag::PremiumListings => "premium_listings",
            FeatureFlag::SupplierAnalytics => "supplier_analytics",
            FeatureFlag::QuoteRequests => "quote_requests",
            FeatureFlag::ReviewsSystem => "reviews_system",
            FeatureFlag::AiComparison => "ai_comparison",
            FeatureFlag::LocationFiltering => "location_filtering",
            FeatureFlag::EmailNotifications => "email_notifications",
        }
    }
}

impl Display for FeatureFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
