use std::collections::{BTreeMap, BTreeSet, HashMap};

// Minimal English stopword list; enough to keep glue words out of the
// vocabulary without dragging in a language-processing dependency.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "in",
    "into", "is", "it", "its", "of", "on", "or", "our", "s", "such", "that", "the", "their",
    "there", "these", "this", "to", "was", "we", "were", "will", "with", "you", "your",
];

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= 2 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectorizer with a vocabulary fixed at fit time.
///
/// Sorted vocabulary and smoothed idf keep the output fully deterministic:
/// the same fit corpus and input text always produce the same vector.
pub struct Vectorizer {
    vocab: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl Vectorizer {
    /// Fit vocabulary and document frequencies over `docs`.
    pub fn fit<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenized: Vec<Vec<String>> = docs.into_iter().map(tokenize).collect();
        let n_docs = tokenized.len();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &tokenized {
            let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocab = BTreeMap::new();
        let mut idf = Vec::with_capacity(df.len());
        for (i, (term, count)) in df.iter().enumerate() {
            vocab.insert((*term).to_string(), i);
            idf.push(((1.0 + n_docs as f64) / (1.0 + *count as f64)).ln() + 1.0);
        }

        Self { vocab, idf }
    }

    /// Transform text into an l2-normalized tf-idf vector. Text with no
    /// in-vocabulary terms yields the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocab.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vec = vec![0.0; self.idf.len()];
        for (idx, count) in counts {
            vec[idx] = count * self.idf[idx];
        }

        let norm = vec.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

/// Cosine similarity of two l2-normalized vectors.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Mean of a label's exemplar vectors, renormalized to unit length.
pub fn centroid(vectors: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let mut mean = vec![0.0; first.len()];
    for v in vectors {
        for (m, x) in mean.iter_mut().zip(v) {
            *m += x;
        }
    }
    let n = vectors.len() as f64;
    for m in &mut mean {
        *m /= n;
    }
    let norm = mean.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for m in &mut mean {
            *m /= norm;
        }
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_drops_stopwords() {
        let tokens = tokenize("The Deer and the Elk, near water!");
        assert_eq!(tokens, vec!["deer", "elk", "near", "water"]);
    }

    #[test]
    fn identical_text_is_identical_vector() {
        let v = Vectorizer::fit(["deer ecology habitat", "salmon stream spawning"]);
        assert_eq!(v.transform("deer habitat"), v.transform("deer habitat"));
    }

    #[test]
    fn cosine_of_same_text_is_one() {
        let v = Vectorizer::fit(["deer ecology habitat", "salmon stream spawning"]);
        let a = v.transform("deer ecology");
        let sim = cosine(&a, &a);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_disjoint_text_is_zero() {
        let v = Vectorizer::fit(["deer ecology habitat", "salmon stream spawning"]);
        let a = v.transform("deer habitat");
        let b = v.transform("salmon stream");
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn out_of_vocabulary_text_is_zero_vector() {
        let v = Vectorizer::fit(["deer ecology habitat"]);
        let z = v.transform("quantum chromodynamics");
        assert!(z.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let v = Vectorizer::fit(["deer habitat", "deer movement", "deer survival"]);
        // "habitat" appears in one doc, "deer" in all three
        let vec = v.transform("deer habitat");
        let habitat_weight = vec.iter().cloned().fold(0.0, f64::max);
        let deer_idx = 0; // "deer" sorts first in the vocabulary
        assert!(vec[deer_idx] < habitat_weight);
    }

    #[test]
    fn centroid_is_unit_length() {
        let v = Vectorizer::fit(["deer ecology", "elk ecology", "bison range"]);
        let c = centroid(&[v.transform("deer ecology"), v.transform("elk ecology")]);
        let norm: f64 = c.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
}
