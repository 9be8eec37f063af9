use std::collections::{BTreeSet, HashSet};

use meshweld::{
    hedron::primitive::attribute::AttributeUsage, AttributeStream, CompletedMesh, Mapping,
    MeshBuilder, StreamValues,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

const SOURCE_VERTICES: u8 = 16;
const UV_POOL: u8 = 4;
const GROUPS: u8 = 3;

/// A corner: source vertex id and texcoord index.
type Corner = (u8, u8);

/// Random polygon soup over a small pool of source vertices & texcoords.
#[derive(Debug, Clone)]
struct Soup {
    polygons: Vec<(u8, Vec<Corner>)>,
}

impl Arbitrary for Soup {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 24;
        let polygons = (0..count)
            .map(|_| {
                let group = u8::arbitrary(g) % GROUPS;
                let corners = 3 + usize::arbitrary(g) % 4;
                let corners = (0..corners)
                    .map(|_| {
                        (
                            u8::arbitrary(g) % SOURCE_VERTICES,
                            u8::arbitrary(g) % UV_POOL,
                        )
                    })
                    .collect();
                (group, corners)
            })
            .collect();
        Self { polygons }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let polygons = self.polygons.clone();
        Box::new((0..polygons.len()).map(move |skip| Soup {
            polygons: polygons
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, p)| p.clone())
                .collect(),
        }))
    }
}

impl Soup {
    fn build(&self) -> CompletedMesh {
        let positions = (0..SOURCE_VERTICES)
            .flat_map(|i| [f32::from(i), f32::from(i % 4), 0.0])
            .collect();
        let uv_indexes = self
            .polygons
            .iter()
            .flat_map(|(_, corners)| corners.iter().map(|&(_, uv)| i32::from(uv)))
            .collect();
        let uv = AttributeStream::new(
            "uv",
            AttributeUsage::Texcoord(0),
            2,
            Mapping::PolygonVertex,
            StreamValues::F32((0..UV_POOL * 2).map(f32::from).collect()),
        )
        .with_indexes(uv_indexes);

        let mut builder = MeshBuilder::new(positions, None, vec![uv]).unwrap();
        let mut pvi = 0;
        for (group, corners) in &self.polygons {
            builder.set_group(u32::from(*group));
            let slots: Vec<usize> = (pvi..pvi + corners.len()).collect();
            let ids: Vec<i32> = corners.iter().map(|&(v, _)| i32::from(v)).collect();
            builder.add_polygon(&slots, &ids).unwrap();
            pvi += corners.len();
        }
        builder.complete().unwrap()
    }

    fn distinct_corners(&self) -> usize {
        self.polygons
            .iter()
            .flat_map(|(_, c)| c.iter().copied())
            .collect::<HashSet<Corner>>()
            .len()
    }
}

#[quickcheck]
fn build_is_deterministic(soup: Soup) -> bool {
    let (a, b) = (soup.build(), soup.build());
    a.geometry == b.geometry && a.index_mapping == b.index_mapping
}

#[quickcheck]
fn one_vertex_per_distinct_corner(soup: Soup) -> bool {
    soup.build().geometry.vertex_count() == soup.distinct_corners()
}

#[quickcheck]
fn fan_yields_n_minus_two(soup: Soup) -> bool {
    let expected: usize = soup.polygons.iter().map(|(_, c)| c.len() - 2).sum();
    soup.build().geometry.triangle_count() == expected
}

#[quickcheck]
fn indices_in_range(soup: Soup) -> bool {
    let geometry = soup.build().geometry;
    let in_range = geometry
        .indices()
        .iter()
        .all(|i| (i as usize) < geometry.vertex_count());
    in_range
}

/// Groups tile the index buffer in ascending material order, without empty groups.
#[quickcheck]
fn groups_cover_indices(soup: Soup) -> bool {
    let geometry = soup.build().geometry;
    let mut next = 0;
    let mut last = None;
    for group in geometry.primitives() {
        if group.from_element != next || group.element_count == 0 {
            return false;
        }
        if last.is_some_and(|m| m >= group.material_index) {
            return false;
        }
        next += group.element_count;
        last = Some(group.material_index);
    }
    let used: BTreeSet<u32> = soup.polygons.iter().map(|(g, _)| u32::from(*g)).collect();
    let found: BTreeSet<u32> = geometry
        .primitives()
        .iter()
        .map(|g| g.material_index)
        .collect();
    next == geometry.indices().len() && used == found
}

/// Every source vertex maps to exactly the consolidated vertices carrying its position.
#[quickcheck]
fn mapping_matches_positions(soup: Soup) -> bool {
    let mesh = soup.build();
    let positions = mesh
        .geometry
        .attribute(AttributeUsage::Position)
        .unwrap()
        .to_vec::<f32, 3>()
        .unwrap();
    let consistent = mesh.index_mapping.iter().all(|(source, targets)| {
        !targets.is_empty()
            && targets
                .iter()
                .all(|&t| positions[t as usize][0] == source as f32)
    });
    let mapped: usize = mesh.index_mapping.iter().map(|(_, t)| t.len()).sum();
    consistent && mapped == positions.len()
}
