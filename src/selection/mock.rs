//! Mock selection store for asserting persistence behaviour in tests.

use mockall::mock;

use crate::selection::SelectionStorage;

mock! {
    pub Storage {}

    impl SelectionStorage for Storage {
        fn load(&self, key: &str) -> Option<String>;
        fn save(&self, key: &str, value: String);
        fn remove(&self, key: &str);
    }
}
