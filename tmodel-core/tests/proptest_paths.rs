//! Property-based tests for checkpoint paths using proptest.

use proptest::prelude::*;
use std::path::PathBuf;

use tmodel_core::{TrainingConfig, WeightsLocator, epoch_label, weights_file_path};

// --- Filename builder properties ---

proptest! {
    #[test]
    fn weights_path_embeds_epoch_verbatim(epoch in "[a-zA-Z0-9_./-]{0,24}") {
        let config = TrainingConfig::default();
        let path = weights_file_path(&config, &epoch);
        let expected = format!("weights/tmodel_{}.pt", epoch);
        prop_assert_eq!(path, PathBuf::from(expected));
    }

    #[test]
    fn weights_path_uses_configured_names(
        folder in "[a-z]{1,12}",
        basename in "[a-z]{1,12}_",
        epoch in "[0-9]{1,4}",
    ) {
        let config = TrainingConfig {
            model_folder: folder.clone(),
            model_basename: basename.clone(),
            ..TrainingConfig::default()
        };
        let path = weights_file_path(&config, &epoch);
        let file_name = format!("{}{}.pt", basename, epoch);
        prop_assert_eq!(path, PathBuf::from(folder).join(file_name));
    }
}

// --- Ordering properties ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn latest_is_max_of_padded_epochs(
        epochs in prop::collection::btree_set(0usize..100, 1..10)
    ) {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("ds_weights");
        std::fs::create_dir_all(&dir).unwrap();
        for epoch in &epochs {
            std::fs::write(dir.join(format!("tmodel_{}.pt", epoch_label(*epoch))), b"").unwrap();
        }

        let config = TrainingConfig {
            datasource: "ds".into(),
            ..TrainingConfig::default()
        };
        let locator = WeightsLocator::new(&config).with_root(tmp.path());
        let max = *epochs.iter().max().unwrap();
        let expected = dir.join(format!("tmodel_{}.pt", epoch_label(max)));
        prop_assert_eq!(locator.latest_weights_file_path().unwrap(), Some(expected));

        let listed = locator.list_weights_files().unwrap();
        prop_assert_eq!(listed.len(), epochs.len());
    }

    #[test]
    fn epoch_label_preserves_numeric_order_below_100(a in 0usize..100, b in 0usize..100) {
        prop_assert_eq!(a.cmp(&b), epoch_label(a).cmp(&epoch_label(b)));
    }
}
