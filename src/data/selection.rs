use super::model::XyzFile;

/// Extension accepted for upload. Matched case-sensitively.
pub const XYZ_SUFFIX: &str = ".xyz";

/// Whether a file name is eligible for upload.
pub fn is_xyz(name: &str) -> bool {
    name.ends_with(XYZ_SUFFIX)
}

/// Keep only `.xyz` candidates, preserving their order.
pub fn select_xyz<I>(candidates: I) -> Vec<XyzFile>
where
    I: IntoIterator<Item = XyzFile>,
{
    candidates
        .into_iter()
        .filter(|f| {
            let keep = is_xyz(&f.name);
            if !keep {
                log::debug!("Skipping non-xyz file {}", f.name);
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn file(name: &str) -> XyzFile {
        XyzFile::from_path(PathBuf::from(name))
    }

    #[test]
    fn keeps_only_xyz_in_order() {
        let picked = select_xyz(vec![
            file("b_2.xyz"),
            file("notes.txt"),
            file("a_1.xyz"),
            file("traj.xyz.bak"),
        ]);
        let names: Vec<_> = picked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b_2.xyz", "a_1.xyz"]);
    }

    #[test]
    fn suffix_is_case_sensitive() {
        assert!(is_xyz("frame_1.xyz"));
        assert!(!is_xyz("frame_1.XYZ"));
        assert!(!is_xyz("xyz"));
    }
}
