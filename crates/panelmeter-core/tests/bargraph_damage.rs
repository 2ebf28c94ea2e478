//! Partial-redraw guarantees of the bargraph, verified by counting draw
//! calls on the mock display.

use panelmeter_core::meter::{Bargraph, Orientation};
use panelmeter_core::mocks::CountingGfx;
use panelmeter_core::ui::gfx::Rect;
use panelmeter_core::ui::integrator::PeakDecay;
use panelmeter_core::ui::palette;

fn bargraph(orientation: Orientation) -> (Bargraph, CountingGfx) {
    let mut gfx = CountingGfx::new();
    let mut bar = Bargraph::new(orientation, PeakDecay::Exponential);
    bar.init(Rect::new(0, 30, 320, 55));
    bar.set_range(&mut gfx, 3, palette::GREEN, false);
    (bar, gfx)
}

#[test]
fn unchanged_update_issues_no_draw_calls() {
    let (mut bar, mut gfx) = bargraph(Orientation::Horizontal);
    // settle: first update may move the peak bookkeeping
    bar.update(&mut gfx, 0.0, -1.0, false);
    gfx.clear();

    bar.update(&mut gfx, 0.0, -1.0, false);
    assert_eq!(gfx.op_count(), 0, "no-op update touched the display");
    bar.update(&mut gfx, 0.0, -1.0, false);
    assert_eq!(gfx.op_count(), 0);
}

#[test]
fn sub_pixel_level_changes_are_swallowed() {
    let (mut bar, mut gfx) = bargraph(Orientation::Horizontal);
    // drive to a steady mid-scale value
    for _ in 0..200 {
        bar.update(&mut gfx, 0.5, -1.0, false);
    }
    gfx.clear();
    // a wiggle below one pixel of bar length must not repaint
    bar.update(&mut gfx, 0.5005, -1.0, false);
    bar.update(&mut gfx, 0.4995, -1.0, false);
    assert_eq!(gfx.op_count(), 0);
}

#[test]
fn over_and_under_range_clamp_to_the_ends() {
    let (mut bar_hi, mut gfx_hi) = bargraph(Orientation::Horizontal);
    let (mut bar_one, mut gfx_one) = bargraph(Orientation::Horizontal);
    for _ in 0..50 {
        bar_hi.update(&mut gfx_hi, 1.5, -1.0, false);
        bar_one.update(&mut gfx_one, 1.0, -1.0, false);
    }
    assert_eq!(gfx_hi.ops, gfx_one.ops, "overrange drew differently");

    let (mut bar_lo, mut gfx_lo) = bargraph(Orientation::Horizontal);
    let (mut bar_zero, mut gfx_zero) = bargraph(Orientation::Horizontal);
    for _ in 0..50 {
        bar_lo.update(&mut gfx_lo, -0.5, -1.0, false);
        bar_zero.update(&mut gfx_zero, 0.0, -1.0, false);
    }
    assert_eq!(gfx_lo.ops, gfx_zero.ops);
}

#[test]
fn growth_paints_only_the_delta_slice() {
    let (mut bar, mut gfx) = bargraph(Orientation::Horizontal);
    bar.update(&mut gfx, 0.0, -1.0, false);
    gfx.clear();

    bar.update(&mut gfx, 1.0, -1.0, false);
    assert!(gfx.op_count() > 0);
    // every strip drawn for the grown slice sits inside the track and is
    // nowhere near full-frame: the track is 55 px tall, so a full-frame
    // repaint would need hundreds of strips more than the delta does
    let strips = gfx
        .ops
        .iter()
        .filter(|op| matches!(op, panelmeter_core::mocks::GfxOp::HLine(..)))
        .count();
    assert!(strips > 0);
    let track_height = 19; // 55/2 - 8 - 1, strips per gradient fill
    assert!(strips <= 2 * track_height as usize + 2);
}

#[test]
fn mark_change_forces_one_full_track_repaint() {
    let (mut bar, mut gfx) = bargraph(Orientation::Horizontal);
    bar.update(&mut gfx, 0.2, -1.0, false);
    gfx.clear();

    // new mark: full background wipe plus the mark triangle
    bar.update(&mut gfx, 0.2, 0.8, false);
    assert!(gfx
        .ops
        .iter()
        .any(|op| matches!(op, panelmeter_core::mocks::GfxOp::FillTriangle(..))));
    let after_mark = gfx.op_count();
    assert!(after_mark > 0);

    // and the same mark again goes back to incremental updates
    gfx.clear();
    for _ in 0..200 {
        bar.update(&mut gfx, 0.2, 0.8, false);
    }
    bar.update(&mut gfx, 0.2, 0.8, false);
    let settled = gfx.op_count();
    gfx.clear();
    bar.update(&mut gfx, 0.2, 0.8, false);
    assert_eq!(gfx.op_count(), 0, "settled update repainted ({settled} ops before)");
}

#[test]
fn peak_indicator_erases_old_position() {
    let mut gfx = CountingGfx::new();
    let mut bar = Bargraph::new(Orientation::Horizontal, PeakDecay::Exponential);
    bar.init(Rect::new(0, 30, 320, 55));
    bar.set_range(&mut gfx, 3, palette::GREEN, true);
    // spike then silence: the peak must fall, drawing red markers lower
    // each frame
    bar.update(&mut gfx, 1.0, -1.0, false);
    gfx.clear();
    for _ in 0..20 {
        bar.update(&mut gfx, 0.0, -1.0, false);
    }
    let red_lines = gfx
        .ops
        .iter()
        .filter(
            |op| matches!(op, panelmeter_core::mocks::GfxOp::VLine(_, _, _, c) if *c == palette::RED),
        )
        .count();
    assert!(red_lines > 0, "decaying peak never redrew its indicator");
}

#[test]
fn vertical_bargraph_shares_the_fast_path() {
    let mut gfx = CountingGfx::new();
    let mut bar = Bargraph::new(Orientation::Vertical, PeakDecay::Exponential);
    bar.init(Rect::new(250, 0, 70, 200));
    bar.set_range(&mut gfx, 3, palette::GREEN, false);
    bar.update(&mut gfx, 0.0, -1.0, false);
    gfx.clear();
    bar.update(&mut gfx, 0.0, -1.0, false);
    assert_eq!(gfx.op_count(), 0);
}
