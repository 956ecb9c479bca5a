mod common;

use common::{gradient_png, gray_png, solid_png, synthetic_service};
use engine::config::BatchConfig;
use engine::{DiagnosisService, EngineConfig};
use shared::ErrorKind;

#[test]
fn corrupt_item_keeps_its_slot() {
    let service = synthetic_service();
    let good = gray_png();
    let corrupt = good[..good.len() / 3].to_vec();
    let other = gradient_png(40, 40, 3);

    let batch = service.classify_batch(&[good.clone(), corrupt, other.clone()]);

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.total_images, 3);
    assert_eq!(batch.processed_images, 2);
    assert_eq!(batch.failed_images, 1);
    assert!(batch.items[0].outcome.is_success());
    assert_eq!(batch.items[1].outcome.error().unwrap().kind, ErrorKind::InvalidImageFormat);
    assert!(batch.items[2].outcome.is_success());

    let single = service.classify_image(&other).unwrap();
    let batched = batch.items[2].outcome.prediction().unwrap();
    assert_eq!(single.top_prediction, batched.top_prediction);
}

#[test]
fn all_invalid_batch_still_covers_every_input() {
    let service = synthetic_service();
    let inputs: Vec<Vec<u8>> = vec![Vec::new(), b"GIF89a".to_vec(), vec![0xFF; 64]];

    let batch = service.classify_batch(&inputs);
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.processed_images, 0);
    assert_eq!(batch.items[0].outcome.error().unwrap().kind, ErrorKind::EmptyInput);
    for (i, item) in batch.items.iter().enumerate() {
        assert_eq!(item.index, i);
        assert!(!item.outcome.is_success());
    }
}

#[test]
fn empty_batch_returns_empty_result() {
    let inputs: Vec<Vec<u8>> = Vec::new();
    let batch = synthetic_service().classify_batch(&inputs);
    assert!(batch.is_empty());
    assert_eq!(batch.total_images, 0);
    assert_eq!(batch.processed_images, 0);
}

#[test]
fn parallel_batch_matches_sequential_order() {
    let inputs: Vec<Vec<u8>> = (0..16u8)
        .map(|i| {
            if i % 5 == 0 {
                vec![i; 10]
            } else {
                gradient_png(20 + i as u32, 18, i * 13)
            }
        })
        .collect();

    let mut parallel_config = EngineConfig::default();
    parallel_config.batch = BatchConfig {
        parallel_threshold: 2,
        max_workers: 4,
    };
    let mut sequential_config = EngineConfig::default();
    sequential_config.batch.parallel_threshold = usize::MAX;

    let parallel = DiagnosisService::synthetic(parallel_config).unwrap().classify_batch(&inputs);
    let sequential = DiagnosisService::synthetic(sequential_config).unwrap().classify_batch(&inputs);

    assert_eq!(parallel.len(), inputs.len());
    assert_eq!(parallel.processed_images, sequential.processed_images);
    for (p, s) in parallel.items.iter().zip(sequential.items.iter()) {
        assert_eq!(p.index, s.index);
        match (p.outcome.prediction(), s.outcome.prediction()) {
            (Some(a), Some(b)) => {
                assert_eq!(a.image_hash, b.image_hash);
                assert_eq!(a.top_prediction, b.top_prediction);
            }
            (None, None) => {
                assert_eq!(p.outcome.error().unwrap().kind, s.outcome.error().unwrap().kind);
            }
            _ => panic!("outcome mismatch at index {}", p.index),
        }
    }
}

#[test]
fn batch_serializes_with_status_tags() {
    let batch = synthetic_service().classify_batch(&[solid_png(8, 8, [10, 120, 40]), Vec::new()]);
    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json["total_images"], 2);
    assert_eq!(json["processed_images"], 1);
    assert_eq!(json["items"][0]["outcome"]["status"], "prediction");
    assert_eq!(json["items"][1]["outcome"]["status"], "error");
    assert_eq!(json["items"][1]["outcome"]["kind"], "empty_input");
}
