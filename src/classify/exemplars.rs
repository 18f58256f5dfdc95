use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Reference corpora anchoring the classifier: one per discipline label,
/// plus graduate/professional corpora for position type. Loaded once per
/// run and immutable for its duration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExemplarSet {
    pub disciplines: BTreeMap<String, Vec<String>>,
    pub graduate: Vec<String>,
    pub professional: Vec<String>,
}

impl ExemplarSet {
    /// The built-in corpus for the wildlife & fisheries board.
    pub fn builtin() -> Self {
        let disciplines = BUILTIN_DISCIPLINES
            .iter()
            .map(|(label, docs)| ((*label).to_string(), docs.iter().map(|d| (*d).to_string()).collect()))
            .collect();
        Self {
            disciplines,
            graduate: BUILTIN_GRADUATE.iter().map(|d| (*d).to_string()).collect(),
            professional: BUILTIN_PROFESSIONAL.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    /// Load a replacement corpus from JSON. Shape mirrors the struct:
    /// `{"disciplines": {"Label": ["text", ...]}, "graduate": [...], "professional": [...]}`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("reading exemplar file {}", path.display()))?;
        let set: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing exemplar file {}", path.display()))?;
        set.validate()?;
        Ok(set)
    }

    /// An empty or partially empty set is fatal: the classifier cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.disciplines.is_empty() {
            bail!("exemplar set has no discipline corpora");
        }
        for (label, docs) in &self.disciplines {
            if docs.iter().all(|d| d.trim().is_empty()) {
                bail!("exemplar corpus for discipline {:?} is empty", label);
            }
        }
        if self.graduate.iter().all(|d| d.trim().is_empty())
            || self.professional.iter().all(|d| d.trim().is_empty())
        {
            bail!("position-type exemplar corpora are empty");
        }
        Ok(())
    }
}

const BUILTIN_DISCIPLINES: &[(&str, &[&str])] = &[
    (
        "Wildlife Ecology",
        &[
            "wildlife ecology and management of deer elk and other ungulate populations",
            "avian ecology songbird nesting success habitat use and migration",
            "bat ecology roost selection and white nose syndrome monitoring",
            "carnivore movement ecology gps collar telemetry and occupancy surveys",
            "waterfowl ecology brood survival and wetland habitat selection",
            "feral swine ecology damage assessment and population management",
        ],
    ),
    (
        "Fisheries Science",
        &[
            "fisheries science salmon spawning migration and stream habitat",
            "trout population dynamics electrofishing surveys and stocking assessment",
            "freshwater mussel propagation and aquatic habitat restoration",
            "sportfish management reservoir creel surveys and angler harvest",
            "estuarine fish ecology oyster reef and coastal nursery habitat",
        ],
    ),
    (
        "Conservation Biology",
        &[
            "conservation biology of endangered species and recovery planning",
            "population viability analysis for threatened amphibians and reptiles",
            "reintroduction biology captive breeding and post release monitoring",
            "landscape connectivity wildlife corridors and protected area design",
        ],
    ),
    (
        "Human Dimensions",
        &[
            "human dimensions of wildlife stakeholder attitudes and survey research",
            "hunter and angler recreation participation and license sales trends",
            "community based conservation outreach and environmental education",
            "policy analysis of natural resource governance and public lands",
        ],
    ),
    (
        "Environmental Science",
        &[
            "water quality monitoring nutrient loading and watershed processes",
            "soil science land use change and ecosystem services assessment",
            "wetland restoration hydrology and vegetation sampling",
            "environmental toxicology contaminant exposure in fish and wildlife",
        ],
    ),
    (
        "Quantitative Ecology",
        &[
            "quantitative ecology bayesian hierarchical models of abundance",
            "mark recapture estimation and survival analysis",
            "species distribution modeling remote sensing and gis analysis",
            "occupancy models detection probability and n mixture estimation",
        ],
    ),
    (
        "Genetics/Genomics",
        &[
            "population genomics sequencing libraries and bioinformatics pipelines",
            "environmental dna edna sampling for species detection",
            "landscape genetics gene flow and microsatellite markers",
            "conservation genomics adaptive variation and inbreeding depression",
        ],
    ),
];

const BUILTIN_GRADUATE: &[&str] = &[
    "graduate research assistantship ms student stipend and tuition waiver",
    "phd graduate assistantship dissertation research with faculty advisor",
    "masters thesis project graduate student position",
    "doctoral fellowship graduate program assistantship stipend",
    "ms assistantship thesis research and graduate school admission",
];

const BUILTIN_PROFESSIONAL: &[&str] = &[
    "full time permanent biologist position with benefits package",
    "seasonal field technician crew member hourly wage",
    "program coordinator manager supervisory experience required",
    "postdoctoral researcher faculty instructor position",
    "agency wildlife specialist analyst years of professional experience",
];
