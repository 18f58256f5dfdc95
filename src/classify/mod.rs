pub mod exemplars;
pub mod tfidf;

use exemplars::ExemplarSet;
use tfidf::Vectorizer;

use crate::normalize::NormalizedPosting;

/// Best-match similarity below this is reported as Unclassified rather
/// than forced to the nearest label.
pub const ACCEPT_THRESHOLD: f64 = 0.12;

/// Reserved label for postings no discipline corpus claims.
pub const UNCLASSIFIED: &str = "Unclassified";

#[derive(Debug, Clone)]
pub struct ClassifiedPosting {
    pub norm: NormalizedPosting,
    pub discipline: String,
    pub discipline_confidence: f64,
    pub is_graduate: bool,
    pub position_confidence: f64,
}

/// Classify a whole batch against the exemplar set.
///
/// The vocabulary is fitted once, jointly over every exemplar document and
/// the batch's own text, so all similarity scores in a run share one
/// feature space. Discipline scoring reads title+tags; position type reads
/// the title alone (supervisory postings mention "graduate students"
/// without being graduate positions, so tags stay out of that signal).
pub fn classify_batch(set: &ExemplarSet, batch: Vec<NormalizedPosting>) -> Vec<ClassifiedPosting> {
    let discipline_texts: Vec<String> = batch.iter().map(|p| discipline_text(p)).collect();

    let mut fit_docs: Vec<&str> = Vec::new();
    for docs in set.disciplines.values() {
        fit_docs.extend(docs.iter().map(String::as_str));
    }
    fit_docs.extend(set.graduate.iter().map(String::as_str));
    fit_docs.extend(set.professional.iter().map(String::as_str));
    fit_docs.extend(discipline_texts.iter().map(String::as_str));
    fit_docs.extend(batch.iter().map(|p| p.raw.title.as_str()));

    let vectorizer = Vectorizer::fit(fit_docs);

    // One centroid per label; BTreeMap order keeps ties deterministic.
    let centroids: Vec<(&str, Vec<f64>)> = set
        .disciplines
        .iter()
        .map(|(label, docs)| {
            let vectors: Vec<Vec<f64>> = docs.iter().map(|d| vectorizer.transform(d)).collect();
            (label.as_str(), tfidf::centroid(&vectors))
        })
        .collect();
    let graduate_centroid = corpus_centroid(&vectorizer, &set.graduate);
    let professional_centroid = corpus_centroid(&vectorizer, &set.professional);

    batch
        .into_iter()
        .zip(discipline_texts)
        .map(|(posting, text)| {
            let vec = vectorizer.transform(&text);
            let (discipline, discipline_confidence) = best_label(&centroids, &vec);

            let title_vec = vectorizer.transform(&posting.raw.title);
            let sim_graduate = tfidf::cosine(&title_vec, &graduate_centroid);
            let sim_professional = tfidf::cosine(&title_vec, &professional_centroid);
            let is_graduate = sim_graduate > sim_professional;
            let position_confidence = sim_graduate.max(sim_professional);

            ClassifiedPosting {
                norm: posting,
                discipline,
                discipline_confidence,
                is_graduate,
                position_confidence,
            }
        })
        .collect()
}

fn discipline_text(posting: &NormalizedPosting) -> String {
    let raw = &posting.raw;
    if raw.tags.is_empty() {
        raw.title.clone()
    } else {
        format!("{} {}", raw.title, raw.tags)
    }
}

fn corpus_centroid(vectorizer: &Vectorizer, docs: &[String]) -> Vec<f64> {
    let vectors: Vec<Vec<f64>> = docs.iter().map(|d| vectorizer.transform(d)).collect();
    tfidf::centroid(&vectors)
}

fn best_label(centroids: &[(&str, Vec<f64>)], vec: &[f64]) -> (String, f64) {
    let mut best: Option<(&str, f64)> = None;
    for (label, centroid) in centroids {
        let sim = tfidf::cosine(vec, centroid);
        if best.map_or(true, |(_, s)| sim > s) {
            best = Some((*label, sim));
        }
    }
    match best {
        Some((label, sim)) if sim >= ACCEPT_THRESHOLD => (label.to_string(), sim),
        Some((_, sim)) => (UNCLASSIFIED.to_string(), sim),
        None => (UNCLASSIFIED.to_string(), 0.0),
    }
}
