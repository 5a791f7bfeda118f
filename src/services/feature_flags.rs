//! Process-wide cache of backend feature flags.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::feature_flag::FeatureFlag;
use crate::repository::FeatureFlagReader;

/// Remembers each flag after its first successful lookup until invalidated.
///
/// Failed lookups read as disabled and are retried on the next call.
#[derive(Debug, Default)]
pub struct FeatureFlagCache {
    values: RwLock<HashMap<FeatureFlag, bool>>,
}

impl FeatureFlagCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cached(&self, flag: FeatureFlag) -> Option<bool> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&flag)
            .copied()
    }

    pub async fn is_enabled<R>(&self, repo: &R, flag: FeatureFlag) -> bool
    where
        R: FeatureFlagReader + ?Sized,
    {
        if let Some(enabled) = self.cached(flag) {
            return enabled;
        }

        match repo.fetch_feature_flag(flag).await {
            Ok(enabled) => {
                self.values
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(flag, enabled);
                enabled
            }
            Err(err) => {
                log::warn!("Failed to fetch feature flag {flag}, treating as disabled: {err}");
                false
            }
        }
    }

    pub fn invalidate(&self) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn invalidate_flag(&self, flag: FeatureFlag) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    #[actix_web::test]
    async fn second_lookup_is_served_from_cache() {
        let repo = TestRepository::new().with_flag(FeatureFlag::ReviewsSystem, true);
        let cache = FeatureFlagCache::new();

        assert!(cache.is_enabled(&repo, FeatureFlag::ReviewsSystem).await);
        assert!(cache.is_enabled(&repo, FeatureFlag::ReviewsSystem).await);

        assert_eq!(repo.flag_fetches.get(), 1);
    }

    #[actix_web::test]
    async fn failed_lookup_is_disabled_and_not_cached() {
        let repo = TestRepository::new();
        let cache = FeatureFlagCache::new();

        assert!(!cache.is_enabled(&repo, FeatureFlag::QuoteRequests).await);

        repo.flags
            .borrow_mut()
            .insert(FeatureFlag::QuoteRequests, true);
        assert!(cache.is_enabled(&repo, FeatureFlag::QuoteRequests).await);
        assert_eq!(repo.flag_fetches.get(), 2);
    }

    #[actix_web::test]
    async fn invalidation_forces_refetch() {
        let repo = TestRepository::new()
            .with_flag(FeatureFlag::ReviewsSystem, false)
            .with_flag(FeatureFlag::AiComparison, true);
        let cache = FeatureFlagCache::new();
        cache.is_enabled(&repo, FeatureFlag::ReviewsSystem).await;
        cache.is_enabled(&repo, FeatureFlag::AiComparison).await;

        repo.flags
            .borrow_mut()
            .insert(FeatureFlag::ReviewsSystem, true);
        cache.invalidate_flag(FeatureFlag::ReviewsSystem);

        assert!(cache.is_enabled(&repo, FeatureFlag::ReviewsSystem).await);
        assert!(cache.is_enabled(&repo, FeatureFlag::AiComparison).await);
        assert_eq!(repo.flag_fetches.get(), 3);

        cache.invalidate();
        cache.is_enabled(&repo, FeatureFlag::AiComparison).await;
        assert_eq!(repo.flag_fetches.get(), 4);
    }
}
