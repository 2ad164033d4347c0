//! Post/comment aggregation.
//!
//! Scores a post's title+body and each comment independently, then blends
//! them: 40% post, 60% comment average. With no comments the overall value
//! is the post compound alone.

use crate::domain::post::{Post, PostSentiment, ScoredPost};
use crate::domain::scoring::HybridScorer;
use crate::domain::sentiment::{SentimentLabel, compound_to_score};
use rayon::prelude::*;
use tracing::debug;

pub const POST_WEIGHT: f64 = 0.4;
pub const COMMENT_WEIGHT: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct PostAggregator {
    scorer: HybridScorer,
    parallel: bool,
}

impl PostAggregator {
    pub fn new(scorer: HybridScorer) -> Self {
        Self {
            scorer,
            parallel: true,
        }
    }

    /// Toggle rayon fan-out across posts. Results are identical either way.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn scorer(&self) -> &HybridScorer {
        &self.scorer
    }

    pub fn analyze(&self, post: &Post) -> PostSentiment {
        let post_scored = self.scorer.score(&post.text());

        let comment_compounds: Vec<f64> = post
            .comments
            .iter()
            .map(|comment| self.scorer.score(comment).blended_compound)
            .collect();

        let avg_comment_compound = if comment_compounds.is_empty() {
            0.0
        } else {
            comment_compounds.iter().sum::<f64>() / comment_compounds.len() as f64
        };

        let overall_compound = if comment_compounds.is_empty() {
            post_scored.blended_compound
        } else {
            post_scored.blended_compound * POST_WEIGHT + avg_comment_compound * COMMENT_WEIGHT
        };

        PostSentiment {
            post_sentiment: post_scored.label,
            post_compound: post_scored.blended_compound,
            post_score: compound_to_score(post_scored.blended_compound),
            post_word_score: post_scored.lexicon_score,
            comment_sentiment: SentimentLabel::classify(avg_comment_compound),
            comment_compound: avg_comment_compound,
            comment_score: compound_to_score(avg_comment_compound),
            comment_scores: comment_compounds.iter().copied().map(compound_to_score).collect(),
            overall_sentiment: SentimentLabel::classify(overall_compound),
            overall_compound,
            overall_score: compound_to_score(overall_compound),
            num_comments_analyzed: comment_compounds.len(),
        }
    }

    pub fn score_post(&self, post: &Post) -> ScoredPost {
        let sentiment = self.analyze(post);
        debug!(
            title = %post.title,
            post = %sentiment.post_sentiment,
            comments = sentiment.num_comments_analyzed,
            overall = %sentiment.overall_sentiment,
            "Scored post"
        );
        ScoredPost {
            post: post.clone(),
            sentiment,
        }
    }

    /// Score a batch, preserving input order.
    pub fn score_batch(&self, posts: &[Post]) -> Vec<ScoredPost> {
        if self.parallel {
            posts.par_iter().map(|post| self.score_post(post)).collect()
        } else {
            posts.iter().map(|post| self.score_post(post)).collect()
        }
    }
}
