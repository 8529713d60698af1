use std::fs;

use crate::classifier::*;
use crate::config::ExperimentConfig;
use crate::corpus::Corpus;
use crate::embedding::EmbeddingStore;
use crate::evaluation::Score;
use crate::graph::DependencyGraph;
use crate::lexicon::*;
use crate::mapper::*;
use crate::resources::ResourceLayout;
use crate::test_utils::load_graphs;

const PARSES: &str = include_str!("./resources/toy.all.lemma.tags");
const FRAME_ELEMENTS: &str = include_str!("./resources/toy.frame.elements");
const LEXICON: &str = include_str!("./resources/toy_lexicon");
const EMBEDDINGS: &str = include_str!("./resources/toy_embeddings");

/// 学習と評価を同じグラフ列で行い、予測したフレーム名と集計結果を返します。
fn run(
    graphs: &[DependencyGraph],
    lexicon: &Lexicon,
    embeddings: &EmbeddingStore,
    config: &ExperimentConfig,
) -> (Vec<String>, Score) {
    let mapper = FeatureMapper::new(config.mapper_kind(), embeddings, lexicon)
        .multiword_averaging(config.is_multiword_averaging());
    let matrix = mapper.get_matrix(graphs);
    let mut clf = Classifier::new(lexicon, config.classifier_config());
    clf.train(&matrix.rows, &matrix.labels, &matrix.lemmapos)
        .unwrap();
    let mut predicted = vec![];
    let mut score = Score::new();
    for ((x, gold), lemmapos) in matrix.rows.iter().zip(&matrix.labels).zip(&matrix.lemmapos) {
        let frame = clf.predict(x, lemmapos).unwrap();
        score.consume(
            Some(frame) == *gold,
            lexicon.is_ambiguous(lemmapos),
            lexicon.is_unknown(lemmapos),
            *gold,
        );
        predicted.push(lexicon.frame(frame).unwrap().to_string());
    }
    (predicted, score)
}

#[test]
fn test_lemma_baseline_breaks_ties_by_candidate_order() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let lexicon = Lexicon::load_from_training_graphs(&graphs);
    let config = ExperimentConfig::new(ClassifierKind::FrequencyBaselineByLemma, MapperKind::Dummy);
    let (predicted, score) = run(&graphs, &lexicon, &EmbeddingStore::empty(), &config);
    // walk.v is seen once with each frame
    assert_eq!(
        vec!["Self_motion", "Self_motion", "Placing", "Self_motion"],
        predicted
    );
    assert_eq!(4, score.total);
    assert_eq!(3, score.correct);
    assert_eq!(2, score.total_ambiguous);
    assert_eq!(1, score.correct_ambiguous);
    assert_eq!(0, score.total_unknown);
}

#[test]
fn test_lemma_baseline_all_unknown_uses_global_prior() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let lexicon = Lexicon::load_from_training_graphs(&graphs);
    let config = ExperimentConfig::new(ClassifierKind::FrequencyBaselineByLemma, MapperKind::Dummy)
        .all_unknown(true);
    let (predicted, score) = run(&graphs, &lexicon, &EmbeddingStore::empty(), &config);
    assert!(predicted.iter().all(|f| f == "Self_motion"));
    assert_eq!(2, score.correct);
}

#[test]
fn test_lexicon_baseline_with_list() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let lexicon = Lexicon::load_from_list(LEXICON.as_bytes(), "toy_lexicon").unwrap();
    assert_eq!(4, lexicon.num_frames());
    let config =
        ExperimentConfig::new(ClassifierKind::FrequencyBaselineByLexicon, MapperKind::Dummy);
    let (predicted, _) = run(&graphs, &lexicon, &EmbeddingStore::empty(), &config);
    assert_eq!(
        vec!["Self_motion", "Self_motion", "Placing", "Self_motion"],
        predicted
    );

    // a lemma unseen in training still resolves through the lexicon
    let clf_config = config.classifier_config();
    let mut clf = Classifier::new(&lexicon, clf_config);
    clf.train(&[[0.0f32]], &[lexicon.frame_id("Motion")], &["walk.v"])
        .unwrap();
    let arriving = lexicon.frame_id("Arriving").unwrap();
    assert_eq!(arriving, clf.predict(&[0.0], "reach.v").unwrap());
}

#[test]
fn test_sentence_features() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let lexicon = Lexicon::load_from_training_graphs(&graphs);
    let embeddings = EmbeddingStore::from_reader(EMBEDDINGS.as_bytes(), "toy_embeddings").unwrap();
    let mapper = FeatureMapper::new(MapperKind::SentenceContext, &embeddings, &lexicon);
    assert_eq!(4, mapper.dim());
    // Mary runs
    assert_eq!(vec![0.25f32, 1.25, 0.0, 2.0], mapper.get_repr(&graphs[1]));
}

#[test]
fn test_dependents_features() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let lexicon = Lexicon::load_from_training_graphs(&graphs);
    let embeddings = EmbeddingStore::from_reader(EMBEDDINGS.as_bytes(), "toy_embeddings").unwrap();
    let mapper = FeatureMapper::new(MapperKind::DependentsContext, &embeddings, &lexicon);
    // John walks home: {john, home, root} and the head "walks"
    let repr = mapper.get_repr(&graphs[0]);
    let expected: [f32; 4] = [2.0 / 3.0, 1.0 / 3.0, 0.0, 1.0];
    for (x, y) in repr.iter().zip(expected) {
        assert!((x - y).abs() < 1e-6);
    }
}

#[test]
fn test_trained_models_keep_unambiguous_predictions() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let lexicon = Lexicon::load_from_training_graphs(&graphs);
    let embeddings = EmbeddingStore::from_reader(EMBEDDINGS.as_bytes(), "toy_embeddings").unwrap();
    let configs = [
        ExperimentConfig::new(ClassifierKind::FeedForward, MapperKind::SentenceContext)
            .num_epochs(5),
        ExperimentConfig::new(ClassifierKind::RankingEmbedding, MapperKind::DependentsContext)
            .num_components(8)
            .num_epochs(5),
    ];
    for config in configs {
        let (predicted, score) = run(&graphs, &lexicon, &embeddings, &config);
        assert_eq!("Self_motion", predicted[1]);
        assert_eq!("Placing", predicted[2]);
        assert_eq!(2, score.correct_unambiguous);
        assert!(["Self_motion", "Motion"].contains(&predicted[3].as_str()));
    }
}

#[test]
fn test_load_from_resource_layout() {
    let root = tempfile::tempdir().unwrap();
    let layout = ResourceLayout::new(root.path());
    fs::create_dir_all(layout.corpora_dir()).unwrap();
    fs::create_dir_all(layout.lexicons_dir()).unwrap();
    fs::create_dir_all(layout.embeddings_dir()).unwrap();
    let (parses, fes) = layout.corpus("toy");
    fs::write(&parses, PARSES).unwrap();
    fs::write(&fes, FRAME_ELEMENTS).unwrap();
    let lexicon_path = layout.lexicon(Some("toy_lexicon")).unwrap();
    fs::write(&lexicon_path, LEXICON).unwrap();
    let embeddings_path = layout.embeddings(Some("toy_embeddings")).unwrap();
    fs::write(&embeddings_path, EMBEDDINGS).unwrap();

    let corpus = Corpus::from_paths(&parses, &fes).unwrap();
    assert_eq!("toy", corpus.name());
    assert_eq!(4, corpus.len());

    let lexicon = Lexicon::load_from_list_file(&lexicon_path).unwrap();
    assert_eq!(&LexiconSource::List("toy_lexicon".to_string()), lexicon.source());

    let embeddings = EmbeddingStore::from_path(&embeddings_path).unwrap();
    assert_eq!("toy_embeddings", embeddings.source());
    assert_eq!(2, embeddings.dim());

    assert!(Corpus::from_paths(layout.corpora_dir(), &fes).is_err());
}
