use super::*;
use crate::testing::{disk_mask, SyntheticFrame};

fn config() -> SegmentationConfig {
    SegmentationConfig {
        min_size: 0,
        membrane_erosion: 0,
        closing_size: 0,
        n_sigma: 0.0,
        downsizing_ratio: 1,
        display_cell_detection: false,
    }
}

fn cell_stack() -> Stack<f64> {
    SyntheticFrame::new(60, 60, 0.0).disk(30, 30, 20, 0.5).repeat(2)
}

#[test]
fn test_vesicles_outside_cell_are_removed() {
    let stack = cell_stack();
    let mut masks = vec![BitBuffer2::new_filled(60, 60, true); 2];
    refine_masks(&stack, &mut masks, &config()).unwrap();
    for mask in &masks {
        assert_eq!(*mask, disk_mask(60, 60, 30, 30, 20));
    }
}

#[test]
fn test_cell_display_replaces_vesicles() {
    let stack = cell_stack();
    let mut masks = vec![BitBuffer2::new_default(60, 60); 2];
    let config = SegmentationConfig {
        display_cell_detection: true,
        ..config()
    };
    refine_masks(&stack, &mut masks, &config).unwrap();
    assert!(masks.iter().all(|m| *m == disk_mask(60, 60, 30, 30, 20)));
}

#[test]
fn test_small_objects_are_removed_per_frame() {
    let stack = cell_stack();
    let vesicles = disk_mask(60, 60, 25, 30, 2);
    let mut both = vesicles.clone();
    both.or_assign(&disk_mask(60, 60, 38, 30, 4));
    let mut masks = vec![both.clone(), vesicles];

    // Disks of radius 2 and 4 hold 13 and 49 pixels
    let config = SegmentationConfig {
        min_size: 14,
        ..config()
    };
    refine_masks(&stack, &mut masks, &config).unwrap();
    assert_eq!(masks[0], disk_mask(60, 60, 38, 30, 4));
    assert!(masks[1].is_clear());
}

#[test]
fn test_frames_get_their_own_cell() {
    // The cell moves between frames
    let a = SyntheticFrame::new(60, 60, 0.0).disk(20, 30, 12, 0.5).build();
    let b = SyntheticFrame::new(60, 60, 0.0).disk(40, 30, 12, 0.5).build();
    let stack = Stack::new(vec![a, b]).unwrap();
    let mut masks = vec![BitBuffer2::new_filled(60, 60, true); 2];
    refine_masks(&stack, &mut masks, &config()).unwrap();
    assert_eq!(masks[0], disk_mask(60, 60, 20, 30, 12));
    assert_eq!(masks[1], disk_mask(60, 60, 40, 30, 12));
}

#[test]
fn test_extra_masks_are_rejected() {
    let stack = cell_stack();
    let mut masks = vec![BitBuffer2::new_filled(60, 60, true); 3];
    let err = refine_masks(&stack, &mut masks, &config()).unwrap_err();
    assert!(
        matches!(err, Error::MaskCount { expected: 2, actual: 3 }),
        "unexpected error: {err}"
    );
    assert!(masks.iter().all(|m| m.count_ones() == 3600));
}

#[test]
fn test_mask_of_wrong_size_is_rejected() {
    let stack = cell_stack();
    let mut masks = vec![
        BitBuffer2::new_filled(60, 60, true),
        BitBuffer2::new_filled(60, 59, true),
    ];
    let err = refine_masks(&stack, &mut masks, &config()).unwrap_err();
    assert!(
        matches!(
            err,
            Error::ShapeMismatch {
                index: 1,
                expected: (60, 60),
                actual: (60, 59)
            }
        ),
        "unexpected error: {err}"
    );
    assert_eq!(masks[0].count_ones(), 3600);
}
