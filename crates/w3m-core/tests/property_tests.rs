//! Pagination invariants over arbitrary directory sizes

mod common;

use common::{test_config, FakeDirectory};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use w3m_core::{DirectoryController, FetchOutcome, StoreHandle};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_listing_loads_every_entry_once(total in 0usize..300, page_size in 1u32..60) {
        let (pages, unique, applied_pages, requested) = runtime().block_on(async {
            let fake = Arc::new(FakeDirectory::new(total));
            let mut config = test_config();
            config.entries_per_page = page_size;
            let controller = DirectoryController::new(fake.clone(), StoreHandle::spawn(), config);

            let mut previous_page = 0;
            loop {
                match controller.fetch_listing_page().await.unwrap() {
                    FetchOutcome::Exhausted => break,
                    FetchOutcome::Applied { .. } => {
                        let page = controller.store().snapshot().page_state.page;
                        // Never skips, never goes back
                        assert!(page == previous_page + 1 || (total == 0 && page == 0));
                        previous_page = page;
                    }
                    FetchOutcome::Stale => unreachable!("sequential fetches are never stale"),
                }
            }

            let snapshot = controller.store().snapshot();
            let unique: HashSet<_> = snapshot.wallets.iter().map(|w| w.id.clone()).collect();
            assert_eq!(unique.len(), snapshot.wallets.len());
            (
                snapshot.page_state.total_pages,
                unique.len(),
                snapshot.page_state.page,
                fake.listing_pages_requested().len(),
            )
        });

        let expected_pages = (total as u32).div_ceil(page_size);
        prop_assert_eq!(pages, Some(expected_pages));
        prop_assert_eq!(unique, total);
        prop_assert_eq!(applied_pages, expected_pages);
        prop_assert_eq!(requested, expected_pages.max(1) as usize);
    }
}
