//! Canned-answer response engine for demos and tests.

use std::cell::RefCell;

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{AnnotationInstruction, Response, ResponseEngine, mentions};
use crate::constants::{IDENTIFY_LABEL, NO_IMAGE_MESSAGE, mock};
use crate::model::{ChartDataset, Rectangle};

/// Reply for "analyze" questions about a selection
pub const ANALYZE_REPLY: &str = "Here's an analysis of the selected region. I've created a chart showing the distribution of elements.";

/// Reply for "identify" questions about a selection
pub const IDENTIFY_REPLY: &str = "I've identified the main object in your selection. It appears to be [object description].";

/// Reply for everything else
pub const GENERIC_REPLY: &str = "Based on the image, I can see [description]. For more specific information, try selecting a part of the image and asking about it directly.";

/// Keyword-matching engine. Chart values are drawn uniformly from
/// [`mock::MIN_VALUE`]..=[`mock::MAX_VALUE`].
#[derive(Debug)]
pub struct MockResponseEngine {
    rng: RefCell<StdRng>,
}

impl MockResponseEngine {
    /// Engine seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    /// Engine with reproducible chart values.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn random_dataset(&self) -> ChartDataset {
        let mut rng = self.rng.borrow_mut();
        let values: Vec<f64> = mock::CATEGORIES
            .iter()
            .map(|_| f64::from(rng.gen_range(mock::MIN_VALUE..=mock::MAX_VALUE)))
            .collect();
        ChartDataset::from_columns(mock::CATEGORIES, values)
    }
}

impl Default for MockResponseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseEngine for MockResponseEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn evaluate(
        &self,
        question: &str,
        selection: Option<&Rectangle>,
        image: Option<&DynamicImage>,
    ) -> Response {
        if image.is_none() {
            return Response::text(NO_IMAGE_MESSAGE);
        }

        match selection {
            Some(_) if mentions(question, "analyze") => {
                Response::text(ANALYZE_REPLY).with_chart(self.random_dataset())
            }
            Some(rect) if mentions(question, "identify") => Response::text(IDENTIFY_REPLY)
                .with_annotation(AnnotationInstruction::new(*rect, IDENTIFY_LABEL)),
            _ => Response::text(GENERIC_REPLY),
        }
    }
}
