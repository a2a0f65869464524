use matcalc_classifiers::config::{DistanceMetric, ModelConfig, ModelType};
use matcalc_classifiers::math::Array2;
use matcalc_classifiers::models::factory;
use matcalc_classifiers::{classify, FeatureMatrix, SampleGroup};

#[test]
fn test_factory_builds_and_classifies() {
    // tiny dataset: 2 features x 6 samples
    let x = Array2::from_shape_vec(
        (2, 6),
        vec![
            1.0, 0.0, 1.0, 0.0, 1.1, 0.0, // f1
            0.0, 1.0, 0.1, 0.9, 0.0, 1.2, // f2
        ],
    )
    .expect("failed to create feature matrix");
    let samples: Vec<String> = (1..=6).map(|i| format!("s{}", i)).collect();
    let m = FeatureMatrix::new(samples, x)
        .unwrap()
        .with_annotation("id", vec!["f1".to_string(), "f2".to_string()])
        .unwrap();

    let groups = vec![
        SampleGroup::new("up", vec!["s1".into(), "s3".into(), "s5".into()]),
        SampleGroup::new("down", vec!["s2".into(), "s4".into(), "s6".into()]),
    ];

    let params = ModelConfig::new(ModelType::GroupCentroid {
        metric: DistanceMetric::Euclidean,
    });

    let trainer = factory::build_trainer(&params);
    let model = trainer.train("toy", &m, &groups).unwrap();
    let result = classify(model.as_ref(), &m);
    assert_eq!(result.len(), m.ncols());
    assert_eq!(result.labels(), &["up", "down", "up", "down", "up", "down"]);
}
