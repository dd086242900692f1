//! Scene flattening
//!
//! [`pack`] walks the body tree pre-order with an explicit stack of
//! `(list, next child)` frames, the same traversal the compute kernel uses
//! to evaluate the result. [`PackedScene::evaluate`] replays that kernel
//! traversal on the host.

use crate::error::PackError;
use crate::layout::{
    BodyRecord, MAX_BODIES_PER_TYPE, MAX_SEGMENTS, MAX_STACK_DEPTH, PRIMITIVE_TYPES,
    PrimitiveType, SEGMENT_SLOTS, TreeNode, mode_from_tag,
};
use bytemuck::Zeroable;
use glam::Vec3;
use sdtrace_core::sdf::{Body, List, Mode, Surface};
use tracing::debug;

/// Flattened scene, sized to the full wire capacity so it uploads as-is
#[derive(Debug, Clone, PartialEq)]
pub struct PackedScene {
    bodies: Vec<BodyRecord>,
    nodes: Vec<TreeNode>,
    counts: [u32; PRIMITIVE_TYPES],
    segments: u32,
}

struct PackFrame<'a> {
    list: &'a List,
    segment: u32,
    next: usize,
}

/// Flatten `root` into segment 0 and its descendants.
///
/// Fails on the first capacity overflow instead of dropping entries.
pub fn pack(root: &List) -> Result<PackedScene, PackError> {
    let mut packed = PackedScene::empty();
    packed.open_segment(0, root)?;
    packed.segments = 1;

    let mut stack = Vec::with_capacity(MAX_STACK_DEPTH);
    stack.push(PackFrame {
        list: root,
        segment: 0,
        next: 0,
    });

    while let Some(top) = stack.last_mut() {
        let list = top.list;
        if top.next >= list.len() {
            stack.pop();
            continue;
        }

        let child = &list.children()[top.next];
        top.next += 1;
        let slot = top.next;
        let segment = top.segment;

        let node = match child {
            Body::List(child_list) => {
                let child_segment = packed.segments;
                if child_segment as usize >= MAX_SEGMENTS {
                    return Err(PackError::TooManySegments { max: MAX_SEGMENTS });
                }
                if stack.len() >= MAX_STACK_DEPTH {
                    return Err(PackError::TooDeep {
                        max: MAX_STACK_DEPTH,
                    });
                }
                packed.open_segment(child_segment, child_list)?;
                packed.segments += 1;
                stack.push(PackFrame {
                    list: child_list,
                    segment: child_segment,
                    next: 0,
                });
                TreeNode::list(child_segment)
            }
            leaf => {
                let Some((kind, record)) = BodyRecord::from_body(leaf) else {
                    continue;
                };
                let index = packed.push_body(kind, record)?;
                TreeNode::body(kind, index)
            }
        };

        packed.set_node(segment, slot as u32, node);
        // Header tracks how many slots are live so far
        packed.nodes[segment as usize * SEGMENT_SLOTS].value = slot as u32;
    }

    debug!(
        segments = packed.segments,
        spheres = packed.body_count(PrimitiveType::Sphere),
        boxes = packed.body_count(PrimitiveType::Box),
        crosses = packed.body_count(PrimitiveType::Cross),
        "Flattened scene"
    );
    Ok(packed)
}

/// Kernel evaluation frame: one list segment being folded
struct EvalFrame {
    segment: u32,
    next: u32,
    count: u32,
    mode: Mode,
    acc: Option<Surface>,
}

impl PackedScene {
    fn empty() -> Self {
        Self {
            bodies: vec![BodyRecord::zeroed(); PRIMITIVE_TYPES * MAX_BODIES_PER_TYPE],
            nodes: vec![TreeNode::default(); MAX_SEGMENTS * SEGMENT_SLOTS],
            counts: [0; PRIMITIVE_TYPES],
            segments: 0,
        }
    }

    /// Write the `(mode, 0)` header of a fresh segment
    fn open_segment(&mut self, segment: u32, list: &List) -> Result<(), PackError> {
        if list.len() >= SEGMENT_SLOTS {
            return Err(PackError::TooManyChildren {
                count: list.len(),
                max: SEGMENT_SLOTS - 1,
            });
        }
        self.set_node(segment, 0, TreeNode::header(list.mode, 0));
        Ok(())
    }

    fn push_body(&mut self, kind: PrimitiveType, record: BodyRecord) -> Result<u32, PackError> {
        let count = &mut self.counts[kind as usize];
        if *count as usize >= MAX_BODIES_PER_TYPE {
            return Err(PackError::TooManyBodies {
                kind,
                max: MAX_BODIES_PER_TYPE,
            });
        }
        let index = *count;
        *count += 1;
        self.bodies[kind as usize * MAX_BODIES_PER_TYPE + index as usize] = record;
        Ok(index)
    }

    fn set_node(&mut self, segment: u32, slot: u32, node: TreeNode) {
        self.nodes[segment as usize * SEGMENT_SLOTS + slot as usize] = node;
    }

    /// Every body record, type-major
    pub fn bodies(&self) -> &[BodyRecord] {
        &self.bodies
    }

    /// Every tree-node slot, segment-major
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node(&self, segment: u32, slot: u32) -> TreeNode {
        self.nodes[segment as usize * SEGMENT_SLOTS + slot as usize]
    }

    pub fn body(&self, kind: PrimitiveType, index: u32) -> &BodyRecord {
        &self.bodies[kind as usize * MAX_BODIES_PER_TYPE + index as usize]
    }

    /// Bodies packed for one primitive type
    pub fn body_count(&self, kind: PrimitiveType) -> u32 {
        self.counts[kind as usize]
    }

    /// Segments in use, root included
    pub fn segment_count(&self) -> u32 {
        self.segments
    }

    fn frame(&self, segment: u32) -> EvalFrame {
        let header = self.node(segment, 0);
        EvalFrame {
            segment,
            next: 1,
            count: header.value,
            mode: mode_from_tag(header.tag).unwrap_or_default(),
            acc: None,
        }
    }

    /// Evaluate the flattened tree at `p` the way the kernel does.
    ///
    /// A finished segment folds its result into the frame below it, so the
    /// fold order matches recursive evaluation of the source tree exactly.
    pub fn evaluate(&self, p: Vec3) -> Surface {
        let mut stack = Vec::with_capacity(MAX_STACK_DEPTH);
        stack.push(self.frame(0));

        while let Some(top) = stack.last_mut() {
            if top.next > top.count {
                let result = top.acc.unwrap_or(Surface::EMPTY);
                stack.pop();
                match stack.last_mut() {
                    Some(parent) => parent.acc = Some(parent.mode.fold(parent.acc, result)),
                    None => return result,
                }
                continue;
            }

            let node = self.node(top.segment, top.next);
            top.next += 1;

            if node.is_list() {
                stack.push(self.frame(node.value));
            } else if let Some(kind) = PrimitiveType::from_tag(node.tag) {
                let surface = self.body(kind, node.value).surface(kind, p);
                top.acc = Some(top.mode.fold(top.acc, surface));
            }
        }
        Surface::EMPTY
    }

    /// Rebuild a body tree from the flattened arrays, starting at segment 0
    pub fn unpack(&self) -> List {
        self.unpack_segment(0)
    }

    fn unpack_segment(&self, segment: u32) -> List {
        let header = self.node(segment, 0);
        let mut list = List::new(mode_from_tag(header.tag).unwrap_or_default());
        for slot in 1..=header.value {
            let node = self.node(segment, slot);
            if node.is_list() {
                list.append(self.unpack_segment(node.value));
            } else if let Some(kind) = PrimitiveType::from_tag(node.tag) {
                list.append(self.body(kind, node.value).to_body(kind));
            }
        }
        list
    }
}
