use std::f32::consts::PI;

use glam::Vec2;

use crate::math_helpers::MyRotate;

/// Side length the agents are usually drawn with
pub const DEFAULT_SIDE_LENGTH: f32 = 5.;

/// Extra reach of the nose vertex over the side length
const NOSE_EXTENSION: f32 = 3.;

/// Outline of an agent glyph in drawing order, ready to be filled as a closed path.
///
/// In the agent's local frame (heading along +x) the vertices are laid on a
/// circle of radius `side_length` at 0, 1/3 and 2/3 of a turn, with one more
/// vertex pushed `NOSE_EXTENSION` further out at a full turn, i.e. the glyph
/// is an arrowhead pointing in the direction of travel. The outline is then
/// rotated by `heading` (radians) and moved to `position`.
pub fn outline(position: Vec2, heading: f32, side_length: f32) -> [Vec2; 4] {
    let a = 2. * PI / 3.;
    let on_circle = |radius: f32, angle: f32| Vec2::new(radius * angle.cos(), radius * angle.sin());

    let local = [
        Vec2::new(side_length, 0.),
        on_circle(side_length, a),
        on_circle(side_length + NOSE_EXTENSION, a * 3.),
        on_circle(side_length, a * 2.),
    ];

    let turn = Vec2::new(heading.cos(), heading.sin());
    local.map(|v| v.rotate(turn) + position)
}
