//! Rank direction.
//!
//! Layout always runs top-to-bottom. Other directions are produced afterwards by mirroring and
//! swapping axes on every rectangle, path and route.

use crate::model::RankDir;
use narwhal_graph::{Point, PortGraph, Rect};

/// Maps a top-to-bottom drawing of size `width × height` into `rank_dir`. Returns the new size.
pub fn apply(g: &mut PortGraph, rank_dir: RankDir, width: f64, height: f64) -> (f64, f64) {
    match rank_dir {
        RankDir::BT | RankDir::RL => reverse_y(g, height),
        RankDir::TB | RankDir::LR => {}
    }

    match rank_dir {
        RankDir::LR | RankDir::RL => {
            swap_xy(g);
            (height, width)
        }
        RankDir::TB | RankDir::BT => (width, height),
    }
}

fn reverse_y(g: &mut PortGraph, height: f64) {
    let flip_rect = |r: &mut Rect| r.y = height - r.y - r.height;
    let flip_point = |p: &mut Point| p.y = height - p.y;
    transform(g, flip_rect, flip_point);
}

fn swap_xy(g: &mut PortGraph) {
    let swap_rect = |r: &mut Rect| {
        (r.x, r.y) = (r.y, r.x);
        (r.width, r.height) = (r.height, r.width);
    };
    let swap_point = |p: &mut Point| (p.x, p.y) = (p.y, p.x);
    transform(g, swap_rect, swap_point);
}

fn transform<R, P>(g: &mut PortGraph, rect: R, point: P)
where
    R: Fn(&mut Rect),
    P: Fn(&mut Point),
{
    g.for_each_node_mut(|_, n| rect(&mut n.rect));
    g.for_each_port_mut(|_, p| rect(&mut p.rect));
    g.for_each_group_mut(|_, grp| rect(&mut grp.rect));
    g.for_each_edge_mut(|_, e| {
        for p in e.paths.iter_mut().flatten() {
            point(p);
        }
    });
    for route in g.routes_mut() {
        for p in &mut route.points {
            point(p);
        }
    }
}
