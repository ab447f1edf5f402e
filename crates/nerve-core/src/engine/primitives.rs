use phf::{Map, phf_map};

/// One geometry feature created inside a part primitive.
#[derive(Debug)]
pub struct FeatureSpec {
    /// Namespace of the feature's identifier within the part's own scope.
    pub namespace: &'static str,
    /// Pseudonym of the feature within the part; unique per recipe.
    pub label: &'static str,
    pub feature_type: &'static str,
}

/// How a part primitive is constructed.
#[derive(Debug)]
pub struct PrimitiveRecipe {
    pub label: &'static str,
    /// Input parameters with their default expressions.
    pub inputs: &'static [(&'static str, &'static str)],
    pub features: &'static [FeatureSpec],
    /// Instances of this primitive carry a point current source.
    pub current_source: bool,
}

const fn feature(
    namespace: &'static str,
    label: &'static str,
    feature_type: &'static str,
) -> FeatureSpec {
    FeatureSpec {
        namespace,
        label,
        feature_type,
    }
}

static PRIMITIVES: Map<&'static str, PrimitiveRecipe> = phf_map! {
    "TubeCuff_Primitive" => PrimitiveRecipe {
        label: "Tube Cuff",
        inputs: &[
            ("N_holes", "0"),
            ("Tube_theta", "340 [deg]"),
            ("Center", "10 [mm]"),
            ("R_in", "1 [mm]"),
            ("R_out", "2 [mm]"),
            ("Tube_L", "5 [mm]"),
            ("Rot_def", "0 [deg]"),
        ],
        features: &[
            feature("wp", "Cuff Cross Section", "WorkPlane"),
            feature("cyl", "Inner Cuff", "Cylinder"),
            feature("cyl", "Outer Cuff", "Cylinder"),
            feature("dif", "Cuff Final", "Difference"),
            feature("csel", "Cuff Final Selection", "CumulativeSelection"),
        ],
        current_source: false,
    },
    "uCuff_Primitive" => PrimitiveRecipe {
        label: "U Cuff",
        inputs: &[
            ("Center", "10 [mm]"),
            ("R_in", "1 [mm]"),
            ("U_thk", "0.5 [mm]"),
            ("U_L", "5 [mm]"),
        ],
        features: &[
            feature("wp", "U Cross Section", "WorkPlane"),
            feature("ext", "Make Cuff", "Extrude"),
            feature("csel", "Cuff Final Selection", "CumulativeSelection"),
        ],
        current_source: false,
    },
    "CuffFill_Primitive" => PrimitiveRecipe {
        label: "Cuff Fill",
        inputs: &[
            ("Radius", "0.5 [mm]"),
            ("Thk", "100 [um]"),
            ("L", "2.5 [mm]"),
            ("Center", "10 [mm]"),
        ],
        features: &[
            feature("cyl", "Cuff Fill", "Cylinder"),
            feature("csel", "Cuff Fill Final Selection", "CumulativeSelection"),
        ],
        current_source: false,
    },
    "RibbonContact_Primitive" => PrimitiveRecipe {
        label: "Ribbon Contact",
        inputs: &[
            ("Ribbon_thk", "0.1 [mm]"),
            ("Ribbon_z", "0.2 [mm]"),
            ("R_in", "1 [mm]"),
            ("Ribbon_recess", "0 [mm]"),
            ("Center", "10 [mm]"),
            ("Ribbon_theta", "120 [deg]"),
            ("Rot_def", "0 [deg]"),
        ],
        features: &[
            feature("wp", "Contact Cross Section", "WorkPlane"),
            feature("ext", "Make Contact", "Extrude"),
            feature("ext", "Make Recess", "Extrude"),
            feature("pt", "Source Point", "Point"),
            feature("csel", "Contact Final Selection", "CumulativeSelection"),
            feature("csel", "Recess Final Selection", "CumulativeSelection"),
            feature("csel", "Source Selection", "CumulativeSelection"),
        ],
        current_source: true,
    },
    "WireContact_Primitive" => PrimitiveRecipe {
        label: "Wire Contact",
        inputs: &[
            ("Wire_r", "37.5 [um]"),
            ("Wire_sep", "10 [um]"),
            ("R_in", "250 [um]"),
            ("Center", "10 [mm]"),
            ("Pitch", "0 [deg]"),
            ("L", "0.2 [mm]"),
        ],
        features: &[
            feature("wp", "Contact Cross Section", "WorkPlane"),
            feature("pc", "Wire Path", "ParametricCurve"),
            feature("swe", "Make Contact", "Sweep"),
            feature("pt", "Source Point", "Point"),
            feature("csel", "Contact Final Selection", "CumulativeSelection"),
            feature("csel", "Source Selection", "CumulativeSelection"),
        ],
        current_source: true,
    },
    "CircleContact_Primitive" => PrimitiveRecipe {
        label: "Circle Contact",
        inputs: &[
            ("Circle_recess", "0 [mm]"),
            ("Rotation_angle", "0 [deg]"),
            ("Center", "10 [mm]"),
            ("Circle_def", "1"),
            ("R_in", "1 [mm]"),
            ("Circle_thk", "0.1 [mm]"),
            ("Overshoot", "0.05 [mm]"),
            ("Circle_diam", "0.5 [mm]"),
        ],
        features: &[
            feature("wp", "Contact Surface", "WorkPlane"),
            feature("ext", "Make Contact", "Extrude"),
            feature("ext", "Make Recess", "Extrude"),
            feature("pt", "Source Point", "Point"),
            feature("csel", "Contact Final Selection", "CumulativeSelection"),
            feature("csel", "Recess Final Selection", "CumulativeSelection"),
            feature("csel", "Source Selection", "CumulativeSelection"),
        ],
        current_source: true,
    },
    "RectangleContact_Primitive" => PrimitiveRecipe {
        label: "Rectangle Contact",
        inputs: &[
            ("Rect_w", "0.5 [mm]"),
            ("Rect_z", "0.5 [mm]"),
            ("Rect_fillet", "0.1 [mm]"),
            ("L_cuff", "5 [mm]"),
            ("Rect_recess", "0 [mm]"),
            ("Rect_thk", "0.1 [mm]"),
            ("Rect_def", "1"),
            ("R_in", "1 [mm]"),
            ("Center", "10 [mm]"),
        ],
        features: &[
            feature("wp", "Contact Surface", "WorkPlane"),
            feature("fil", "Contact Corners", "Fillet"),
            feature("ext", "Make Contact", "Extrude"),
            feature("ext", "Make Recess", "Extrude"),
            feature("pt", "Source Point", "Point"),
            feature("csel", "Contact Final Selection", "CumulativeSelection"),
            feature("csel", "Recess Final Selection", "CumulativeSelection"),
            feature("csel", "Source Selection", "CumulativeSelection"),
        ],
        current_source: true,
    },
    "HelicalCuffnContact_Primitive" => PrimitiveRecipe {
        label: "Helical Cuff and Contact",
        inputs: &[
            ("Center", "10 [mm]"),
            ("Corr", "0"),
            ("rev_cuff_LN", "2.5"),
            ("rev_cuff_c_LN", "1"),
            ("thk_cuff_LN", "0.6 [mm]"),
            ("w_cuff_LN", "1 [mm]"),
            ("r_cuff_in_LN", "1 [mm]"),
            ("pitch_helix_LN", "1.5 [mm]"),
            ("thk_elec_LN", "0.05 [mm]"),
            ("w_elec_LN", "0.5 [mm]"),
        ],
        features: &[
            feature("pc", "Cuff Helix", "ParametricCurve"),
            feature("swe", "Make Cuff", "Sweep"),
            feature("pc", "Contact Helix", "ParametricCurve"),
            feature("swe", "Make Contact", "Sweep"),
            feature("pt", "Source Point", "Point"),
            feature("csel", "Cuff Final Selection", "CumulativeSelection"),
            feature("csel", "Contact Final Selection", "CumulativeSelection"),
            feature("csel", "Source Selection", "CumulativeSelection"),
        ],
        current_source: true,
    },
    "uContact_Primitive" => PrimitiveRecipe {
        label: "U Contact",
        inputs: &[
            ("Center", "10 [mm]"),
            ("R_in", "1 [mm]"),
            ("U_tangent", "0.5 [mm]"),
            ("U_thk", "0.1 [mm]"),
            ("U_z", "0.5 [mm]"),
        ],
        features: &[
            feature("wp", "Contact Cross Section", "WorkPlane"),
            feature("ext", "Make Contact", "Extrude"),
            feature("pt", "Source Point", "Point"),
            feature("csel", "Contact Final Selection", "CumulativeSelection"),
            feature("csel", "Source Selection", "CumulativeSelection"),
        ],
        current_source: true,
    },
    "FascicleCI" => PrimitiveRecipe {
        label: "Fascicle (contact impedance)",
        inputs: &[],
        features: &[
            feature("wp", "Fascicle Cross Section", "WorkPlane"),
            feature("ic", "Inner Contour", "InterpolationCurve"),
            feature("ext", "Make Endoneurium", "Extrude"),
            feature("csel", "Endoneurium Selection", "CumulativeSelection"),
            feature("csel", "Perineurium Boundary Selection", "CumulativeSelection"),
        ],
        current_source: false,
    },
    "FascicleMesh" => PrimitiveRecipe {
        label: "Fascicle (meshed perineurium)",
        inputs: &[],
        features: &[
            feature("wp", "Fascicle Cross Section", "WorkPlane"),
            feature("ic", "Inner Contours", "InterpolationCurve"),
            feature("ic", "Outer Contour", "InterpolationCurve"),
            feature("dif", "Make Perineurium", "Difference"),
            feature("ext", "Make Fascicle", "Extrude"),
            feature("csel", "Endoneurium Selection", "CumulativeSelection"),
            feature("csel", "Perineurium Selection", "CumulativeSelection"),
        ],
        current_source: false,
    },
};

/// Looks up the construction recipe for a primitive type name.
pub fn recipe(type_name: &str) -> Option<&'static PrimitiveRecipe> {
    PRIMITIVES.get(type_name)
}

/// Every primitive type name with a known recipe, sorted.
pub fn known_types() -> Vec<&'static str> {
    let mut names: Vec<_> = PRIMITIVES.keys().copied().collect();
    names.sort_unstable();
    names
}
