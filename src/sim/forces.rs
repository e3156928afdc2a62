use eframe::egui::Vec2;

use super::quadtree::QuadNode;
use super::{Link, SimNode};

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
}

/// Tiny deterministic offset used when two points coincide on an axis.
pub(super) fn jiggle(seed: usize) -> f32 {
    let phase = ((seed as f32) * 0.618_034 + 0.37).fract();
    let magnitude = (0.5 + phase) * 1e-6;
    if seed % 2 == 0 { magnitude } else { -magnitude }
}

pub(super) fn apply_links(nodes: &mut [SimNode], links: &[Link], distance: f32, alpha: f32) {
    for (link_index, link) in links.iter().enumerate() {
        let source = &nodes[link.source];
        let target = &nodes[link.target];
        let mut delta =
            (target.position + target.velocity) - (source.position + source.velocity);
        if delta.x == 0.0 {
            delta.x = jiggle(link_index * 2);
        }
        if delta.y == 0.0 {
            delta.y = jiggle(link_index * 2 + 1);
        }

        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * link.strength);

        nodes[link.target].velocity -= correction * link.bias;
        nodes[link.source].velocity += correction * (1.0 - link.bias);
    }
}

fn charge_contribution(
    mut delta: Vec2,
    weight: f32,
    alpha: f32,
    distance_min_sq: f32,
    seed: usize,
) -> Vec2 {
    if delta.x == 0.0 {
        delta.x = jiggle(seed);
    }
    if delta.y == 0.0 {
        delta.y = jiggle(seed.wrapping_add(1));
    }

    let mut distance_sq = delta.length_sq();
    if distance_sq < distance_min_sq {
        distance_sq = (distance_min_sq * distance_sq).sqrt();
    }
    delta * (weight * alpha / distance_sq)
}

fn accumulate_charge(
    quad: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    alpha: f32,
    velocity: &mut Vec2,
) {
    if quad.mass <= 0.0 {
        return;
    }

    let point = positions[index];
    let delta = quad.center_of_mass - point;
    let side = quad.bounds.side_length();
    let far_enough = side * side / (params.theta * params.theta) < delta.length_sq();

    if far_enough && !quad.bounds.contains(point) {
        *velocity += charge_contribution(
            delta,
            params.strength * quad.mass,
            alpha,
            params.distance_min_sq,
            index,
        );
        return;
    }

    if quad.is_leaf() {
        for &other in &quad.indices {
            if other == index {
                continue;
            }
            *velocity += charge_contribution(
                positions[other] - point,
                params.strength,
                alpha,
                params.distance_min_sq,
                index.wrapping_mul(31) ^ other.wrapping_mul(131),
            );
        }
        return;
    }

    for child in quad.children.iter().flatten() {
        accumulate_charge(child, index, positions, params, alpha, velocity);
    }
}

pub(super) fn apply_charge(
    nodes: &mut [SimNode],
    positions: &mut Vec<Vec2>,
    params: ChargeParams,
    alpha: f32,
) {
    positions.clear();
    positions.extend(nodes.iter().map(|node| node.position));

    let Some(tree) = QuadNode::build(positions) else {
        return;
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        accumulate_charge(&tree, index, positions, params, alpha, &mut node.velocity);
    }
}

/// Translates every node so the mean position moves onto `center`.
pub(super) fn apply_center(nodes: &mut [SimNode], center: Vec2, strength: f32) {
    if nodes.is_empty() {
        return;
    }

    let mut mean = Vec2::ZERO;
    for node in nodes.iter() {
        mean += node.position;
    }
    mean /= nodes.len() as f32;

    let shift = (mean - center) * strength;
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}
