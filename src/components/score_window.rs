use std::collections::VecDeque;

/// The scores of the most recent episodes, up to a fixed window size.
#[derive(Debug, Clone)]
pub struct ScoreWindow {
    scores: VecDeque<f64>,
    size: usize,
}
impl ScoreWindow {
    pub fn new(size: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(size),
            size,
        }
    }

    pub fn push(
        &mut self,
        score: f64,
    ) {
        if self.size == 0 {
            return;
        }
        if self.scores.len() == self.size {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Mean of the scores in the window, 0.0 while it is empty.
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            0.0
        } else {
            self.scores.iter().sum::<f64>() / self.scores.len() as f64
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn last(&self) -> Option<f64> {
        self.scores.back().copied()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_mean() {
        let mut window = ScoreWindow::new(3);
        assert_eq!(window.mean(), 0.0);
        window.push(1.0);
        window.push(2.0);
        assert_eq!(window.mean(), 1.5);
        window.push(3.0);
        window.push(10.0);
        assert_eq!(window.len(), 3);
        assert_eq!(window.mean(), 5.0);
        assert_eq!(window.last(), Some(10.0));
    }
}
