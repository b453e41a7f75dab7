use emolens::{importance::rank, model::Separator, Emotion};
use proptest::prelude::*;

proptest! {
    #[test]
    fn ranking_covers_every_column_in_non_increasing_order(
        weights in prop::collection::vec(-5.0f64..5.0, 1..40)
    ) {
        let names: Vec<String> = (0..weights.len()).map(|i| format!("f{i}")).collect();
        let separator = Separator::from_parts(Emotion::Sadness, weights.clone(), 0.0);
        let ranking = rank(&separator, &names).unwrap();

        prop_assert_eq!(ranking.len(), weights.len());
        for pair in ranking.features.windows(2) {
            prop_assert!(pair[0].weight >= pair[1].weight);
            if pair[0].weight == pair[1].weight {
                prop_assert!(pair[0].column < pair[1].column);
            }
        }
        for feature in &ranking.features {
            prop_assert_eq!(&names[feature.column], &feature.name);
            prop_assert_eq!(weights[feature.column], feature.weight);
        }
    }
}
