use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tag_tfidf::{ItemTagSource, MemoryItemTagSource, TfIdfModel, TfIdfModelBuilder};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn movie_corpus() -> MemoryItemTagSource {
    [
        (1, vec!["comedy", "comedy", "drama"]),
        (2, vec!["comedy"]),
    ]
    .into_iter()
    .collect()
}

/// item -> tag -> weight, independent of tag ids
fn weights_by_name(model: &TfIdfModel) -> HashMap<u64, HashMap<String, f64>> {
    model
        .item_ids()
        .map(|&item| {
            let weights = model
                .item_tag_weights(&item)
                .unwrap_or_default()
                .into_iter()
                .map(|(tag, w)| (tag.to_string(), w))
                .collect();
            (item, weights)
        })
        .collect()
}

#[test]
fn two_item_worked_example() {
    init_logger();
    let source = movie_corpus();
    let model = TfIdfModelBuilder::new(&source).build().unwrap();

    assert_eq!(model.num_tags(), 2);
    assert_eq!(model.num_items(), 2);
    let comedy = model.tag_id("comedy").unwrap();
    let drama = model.tag_id("drama").unwrap();

    let a = model.item_vector(&1).unwrap();
    assert_eq!(a.nnz(), 2);
    assert_eq!(a.get(comedy), Some(0.0));
    assert!(close(a.get(drama).unwrap(), 2f64.ln() / 5f64.sqrt()));
    assert!((a.get(drama).unwrap() - 0.3100).abs() < 1e-4);

    let b = model.item_vector(&2).unwrap();
    assert_eq!(b.nnz(), 1);
    assert_eq!(b.get(comedy), Some(0.0));
}

#[test]
fn universal_tag_weighs_zero_everywhere() {
    init_logger();
    let source: MemoryItemTagSource = [
        (1, vec!["x", "a"]),
        (2, vec!["x", "x", "b"]),
        (3, vec!["x", "c", "a"]),
    ]
    .into_iter()
    .collect();
    let model = TfIdfModelBuilder::new(&source).build().unwrap();
    let x = model.tag_id("x").unwrap();
    for item in source.item_ids() {
        assert_eq!(model.item_vector(&item).unwrap().get(x), Some(0.0));
    }
}

#[test]
fn untagged_item_gets_empty_vector() {
    init_logger();
    let mut source = movie_corpus();
    source.add_item(3);
    let model = TfIdfModelBuilder::new(&source).build().unwrap();

    let empty = model.item_vector(&3).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.norm(), 0.0);
    // the untagged item still counts towards the item total
    let drama = model.tag_id("drama").unwrap();
    let a = model.item_vector(&1).unwrap();
    assert!(close(a.get(drama).unwrap(), 3f64.ln() / 5f64.sqrt()));
    for item in model.item_ids() {
        assert!(model.item_vector(item).unwrap().values().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn distinct_tags_get_distinct_ids() {
    let source: MemoryItemTagSource = [
        (1, vec!["a", "b", "c"]),
        (2, vec!["c", "d"]),
        (3, vec!["e", "a"]),
    ]
    .into_iter()
    .collect();
    let model = TfIdfModelBuilder::new(&source).build().unwrap();
    let mut ids: Vec<_> = model.tags().map(|(_, id)| id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    for (tag, id) in model.tags() {
        assert_eq!(model.tag_name(id), Some(tag));
    }
    assert_eq!(model.tag_id("z"), None);
}

#[test]
fn uniform_idf_scales_norm_by_that_idf() {
    // every tag on exactly one item, so every idf is ln(3)
    let source: MemoryItemTagSource = [
        (1, vec!["a", "a", "b"]),
        (2, vec!["c"]),
        (3, vec!["d", "e", "e", "e"]),
    ]
    .into_iter()
    .collect();
    let model = TfIdfModelBuilder::new(&source).build().unwrap();
    let idf = 3f64.ln();
    for item in model.item_ids() {
        assert!(close(model.item_vector(item).unwrap().norm(), idf));
    }
}

#[test]
fn rebuilds_and_parallel_build_agree() {
    init_logger();
    let mut source = MemoryItemTagSource::new();
    for item in 0..200u64 {
        let tags: Vec<String> = (0..(item % 7))
            .map(|k| format!("tag{}", (item * 31 + k * 17) % 23))
            .collect();
        source.add_tags(item, &tags);
    }

    let first = TfIdfModelBuilder::new(&source).build().unwrap();
    let second = TfIdfModelBuilder::new(&source).build().unwrap();
    let par = TfIdfModelBuilder::new(&source).build_par().unwrap();

    assert_eq!(first.num_items(), 200);
    assert_eq!(weights_by_name(&first), weights_by_name(&second));
    assert_eq!(weights_by_name(&first), weights_by_name(&par));
    assert_eq!(
        first.item_ids().collect::<Vec<_>>(),
        par.item_ids().collect::<Vec<_>>()
    );
}

#[test]
fn model_survives_serde() {
    let source = movie_corpus();
    let model = TfIdfModelBuilder::new(&source).build().unwrap();
    let bytes = serde_cbor::to_vec(&model).unwrap();
    let restored: TfIdfModel = serde_cbor::from_slice(&bytes).unwrap();
    assert_eq!(restored.tag_id("drama"), model.tag_id("drama"));
    assert_eq!(weights_by_name(&restored), weights_by_name(&model));
}

/// vocabulary lists a tag that no item carries
struct SpareTag;

impl ItemTagSource for SpareTag {
    type ItemId = u64;

    fn tag_vocabulary(&self) -> Vec<String> {
        ["comedy", "silent", "drama"].iter().map(|t| t.to_string()).collect()
    }

    fn item_ids(&self) -> Vec<u64> {
        vec![1, 2]
    }

    fn item_tags(&self, item: &u64) -> Vec<String> {
        match item {
            1 => vec!["comedy".to_string(), "drama".to_string()],
            _ => vec!["comedy".to_string()],
        }
    }
}

#[test]
fn unused_vocabulary_tag_has_id_but_no_weight() {
    init_logger();
    let builder = TfIdfModelBuilder::new(&SpareTag);
    for model in [builder.build().unwrap(), builder.build_par().unwrap()] {
        assert_eq!(model.num_tags(), 3);
        let silent = model.tag_id("silent").unwrap();
        for item in model.item_ids() {
            let vec = model.item_vector(item).unwrap();
            assert!(!vec.contains_key(silent));
            assert!(vec.values().iter().all(|v| v.is_finite()));
        }
        // the spare tag does not disturb the other weights
        let drama = model.tag_id("drama").unwrap();
        let a = model.item_vector(&1).unwrap();
        assert!(close(a.get(drama).unwrap(), 2f64.ln() / 2f64.sqrt()));
    }
}

#[derive(Serialize)]
struct RawVocab {
    tags: Vec<&'static str>,
}

#[derive(Serialize)]
struct RawVec {
    inds: Vec<u32>,
    vals: Vec<f64>,
}

#[derive(Serialize)]
struct RawModel {
    vocab: RawVocab,
    item_vectors: BTreeMap<u64, RawVec>,
}

fn raw_model(tags: Vec<&'static str>, inds: Vec<u32>) -> Vec<u8> {
    let vals = vec![0.5; inds.len()];
    let mut item_vectors = BTreeMap::new();
    item_vectors.insert(1, RawVec { inds, vals });
    serde_cbor::to_vec(&RawModel { vocab: RawVocab { tags }, item_vectors }).unwrap()
}

#[test]
fn loading_rejects_inconsistent_tag_ids() {
    // a repeated tag would shift "b" from id 3 to id 2
    let bytes = raw_model(vec!["a", "a", "b"], vec![3]);
    assert!(serde_cbor::from_slice::<TfIdfModel>(&bytes).is_err());

    // key 3 with only two tags
    let bytes = raw_model(vec!["a", "b"], vec![3]);
    assert!(serde_cbor::from_slice::<TfIdfModel>(&bytes).is_err());

    // key 0 is never assigned
    let bytes = raw_model(vec!["a", "b"], vec![0]);
    assert!(serde_cbor::from_slice::<TfIdfModel>(&bytes).is_err());

    let bytes = raw_model(vec!["a", "b"], vec![2]);
    let model = serde_cbor::from_slice::<TfIdfModel>(&bytes).unwrap();
    assert_eq!(model.tag_id("b"), Some(2));
    assert_eq!(model.item_tag_weights(&1), Some(vec![("b", 0.5)]));
}
