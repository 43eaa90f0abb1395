#![allow(dead_code)]

extern crate std;

use crate::types::{Bin, Widget};

/// INV-1: a bin never sells more units than it has members.
pub fn assert_sold_within_inventory(bin: &Bin) {
    assert!(
        bin.sold_count <= bin.widget_count,
        "INV-1 violated: bin {} sold {} of {} widgets",
        bin.id,
        bin.sold_count,
        bin.widget_count
    );
}

/// INV-2: treasury moves by exactly the sale or withdrawal amount.
pub fn assert_treasury_delta(before: i128, after: i128, delta: i128) {
    assert_eq!(
        after,
        before + delta,
        "INV-2 violated: treasury {} + {} != {}",
        before,
        delta,
        after
    );
}

/// INV-3: treasury is never negative.
pub fn assert_treasury_non_negative(balance: i128) {
    assert!(balance >= 0, "INV-3 violated: treasury is {}", balance);
}

/// INV-4: a widget's bin is the first whose mask its results fully cover,
/// given the masks in force when it was recorded.
pub fn assert_classified_first_match(widget: &Widget, masks_at_record: &[u32]) {
    let expected = masks_at_record
        .iter()
        .position(|mask| widget.results & mask == *mask)
        .map(|offset| offset as u32 + 1);
    assert_eq!(
        Some(widget.bin),
        expected,
        "INV-4 violated: serial {} with results {:#010x} in bin {}",
        widget.serial,
        widget.results,
        widget.bin
    );
}

/// INV-5: bin members are ledger indices in strictly increasing order (FIFO).
pub fn assert_fifo_members(members: &[u32]) {
    for pair in members.windows(2) {
        assert!(
            pair[0] < pair[1],
            "INV-5 violated: member {} listed before {}",
            pair[0],
            pair[1]
        );
    }
}

/// INV-6: a bin's tuning may change, but its counters never go backwards.
pub fn assert_bin_counters_monotonic(before: &Bin, after: &Bin) {
    assert_eq!(before.id, after.id, "INV-6 violated: bin id changed");
    assert!(
        after.widget_count >= before.widget_count,
        "INV-6 violated: bin {} shrank from {} to {}",
        before.id,
        before.widget_count,
        after.widget_count
    );
    assert!(
        after.sold_count >= before.sold_count,
        "INV-6 violated: bin {} sold count fell from {} to {}",
        before.id,
        before.sold_count,
        after.sold_count
    );
}

/// Run all stateless bin invariants.
pub fn assert_all_bin_invariants(bin: &Bin) {
    assert_sold_within_inventory(bin);
}
