//! Insertion point selection for the control fragment.
//!
//! Host layouts vary by viewport and experiment, so no single anchor is
//! guaranteed to exist. Strategies are tried in order and the first one whose
//! region is present wins; when none match nothing is mounted and the next
//! mutation batch retries.

use looper_shared::InsertionStrategy;

/// Lookup of page regions a strategy can anchor to.
pub trait PageRegions {
    type Region;

    /// The anchor for `strategy`, if it exists and satisfies the placement
    /// (e.g. `before`/`after` need a parent node).
    fn locate(&self, strategy: &InsertionStrategy) -> Option<Self::Region>;
}

pub fn choose_insertion<'a, P: PageRegions>(
    page: &P,
    strategies: &'a [InsertionStrategy],
) -> Option<(&'a InsertionStrategy, P::Region)> {
    strategies
        .iter()
        .find_map(|strategy| page.locate(strategy).map(|region| (strategy, region)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePlatform;
    use looper_shared::config::MountSection;

    #[test]
    fn first_present_region_wins() {
        let page = FakePlatform::new();
        page.add_region("#primary-inner");
        page.add_region("#movie_player");
        let strategies = MountSection::default().strategies;

        let (strategy, region) = choose_insertion(&page, &strategies).unwrap();
        assert_eq!(strategy.selector, "#primary-inner");
        assert_eq!(region, "#primary-inner");
    }

    #[test]
    fn title_is_preferred_over_everything() {
        let page = FakePlatform::new();
        page.add_region("#movie_player");
        page.add_region("ytd-watch-metadata");
        page.add_region("#title");
        let strategies = MountSection::default().strategies;

        let (strategy, _) = choose_insertion(&page, &strategies).unwrap();
        assert_eq!(strategy.selector, "#title");
    }

    #[test]
    fn no_region_means_no_insertion() {
        let page = FakePlatform::new();
        page.add_region("#comments");
        let strategies = MountSection::default().strategies;

        assert!(choose_insertion(&page, &strategies).is_none());
    }
}
