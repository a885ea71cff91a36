//! Random selection without replacement.

use tracing::{debug, warn};

use crate::flickr::Photo;

/// The photos picked for this run.
#[derive(Debug, Default)]
pub struct Selection {
    /// Picked photos, in draw order
    pub photos: Vec<Photo>,
    /// How many indices were drawn
    pub draws: usize,
    /// Set when the list ran dry before we had picked enough
    pub exhausted: bool,
}

/// Picks `count` photos at random, removing each from `photos` as it goes.
pub fn select_random(photos: &mut Vec<Photo>, count: usize) -> Selection {
    select_with(photos, count, |len| rand::random_range(0..len))
}

/// Picks up to `count` photos using `draw`, which is handed the current list
/// length and must return an index in `0..len`.
///
/// Each pick is removed from `photos` before the next draw, so an index is only
/// ever drawn against the list as it is now. An empty list gets no draws.
pub fn select_with<F>(photos: &mut Vec<Photo>, count: usize, mut draw: F) -> Selection
where
    F: FnMut(usize) -> usize,
{
    let mut selection = Selection {
        photos: Vec::with_capacity(count.min(photos.len())),
        ..Default::default()
    };

    while selection.photos.len() < count {
        let len = photos.len();
        if len == 0 {
            warn!(
                "Ran out of photos after picking {} of {}",
                selection.photos.len(),
                count
            );
            selection.exhausted = true;
            break;
        }
        let idx = draw(len);
        selection.draws += 1;
        debug!("Drew index {} of {}", idx, len);
        selection.photos.push(photos.remove(idx));
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|n| Photo {
                id: format!("{n}"),
                owner: "1234@N00".to_string(),
                secret: format!("secret{n}"),
                server: "65535".to_string(),
                farm: 66,
                title: format!("photo {n}"),
                ispublic: 1,
                isfriend: 0,
                isfamily: 0,
            })
            .collect()
    }

    #[test]
    fn test_random_selection_is_distinct() {
        for _ in 0..200 {
            let mut list = photos(10);
            let selection = select_random(&mut list, 3);
            assert_eq!(selection.draws, 3);
            assert!(!selection.exhausted);
            assert_eq!(list.len(), 7);
            let ids: HashSet<&str> = selection.photos.iter().map(|p| p.id.as_str()).collect();
            assert_eq!(ids.len(), 3);
            for picked in &selection.photos {
                assert!(!list.contains(picked));
            }
        }
    }

    #[test]
    fn test_always_drawing_the_last_index() {
        let mut list = photos(5);
        let mut lengths = Vec::new();
        let selection = select_with(&mut list, 5, |len| {
            lengths.push(len);
            len - 1
        });
        assert_eq!(lengths, vec![5, 4, 3, 2, 1]);
        let ids: Vec<&str> = selection.photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "2", "1", "0"]);
        assert!(list.is_empty());
        assert!(!selection.exhausted);
    }

    #[test]
    fn test_empty_list_makes_no_draws() {
        let mut list = Vec::new();
        let selection = select_with(&mut list, 3, |_| 0);
        assert_eq!(selection.draws, 0);
        assert!(selection.photos.is_empty());
        assert!(selection.exhausted);
    }

    #[test]
    fn test_zero_count() {
        let mut list = photos(4);
        let selection = select_random(&mut list, 0);
        assert_eq!(selection.draws, 0);
        assert!(selection.photos.is_empty());
        assert!(!selection.exhausted);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_count_larger_than_list() {
        let mut list = photos(2);
        let selection = select_random(&mut list, 3);
        assert_eq!(selection.draws, 2);
        assert_eq!(selection.photos.len(), 2);
        assert!(selection.exhausted);
    }
}
