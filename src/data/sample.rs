use super::model::{Clip, Dataset, Project};

fn project(id: &str, name: &str, clips: &[&str]) -> Project {
    Project {
        id: id.to_owned(),
        name: name.to_owned(),
        clips: clips.iter().map(|clip| clip.to_string()).collect(),
    }
}

fn clip(id: &str, name: &str, used_in_projects: &[&str]) -> Clip {
    Clip {
        id: id.to_owned(),
        name: name.to_owned(),
        used_in_projects: used_in_projects
            .iter()
            .map(|project| project.to_string())
            .collect(),
    }
}

/// Five editing projects sharing ten clips.
pub fn sample_dataset() -> Dataset {
    let projects = vec![
        project(
            "project-1",
            "First Project",
            &["clip-1", "clip-2", "clip-3", "clip-4", "clip-5", "clip-6"],
        ),
        project(
            "project-2",
            "Second Project",
            &["clip-1", "clip-2", "clip-4", "clip-5", "clip-7"],
        ),
        project(
            "project-3",
            "Third Project",
            &["clip-2", "clip-3", "clip-5", "clip-6", "clip-8"],
        ),
        project(
            "project-4",
            "Fourth Project",
            &["clip-1", "clip-3", "clip-6", "clip-7", "clip-8", "clip-9"],
        ),
        project(
            "project-5",
            "Fifth Project",
            &["clip-2", "clip-3", "clip-4", "clip-7", "clip-9", "clip-10"],
        ),
    ];

    let clips = vec![
        clip(
            "clip-1",
            "Intro Clip",
            &["project-1", "project-2", "project-4"],
        ),
        clip(
            "clip-2",
            "Transition Clip",
            &["project-1", "project-2", "project-3", "project-5"],
        ),
        clip(
            "clip-3",
            "Main Clip",
            &["project-1", "project-3", "project-4", "project-5"],
        ),
        clip(
            "clip-4",
            "Outro Clip",
            &["project-1", "project-2", "project-5"],
        ),
        clip(
            "clip-5",
            "B-roll Clip",
            &["project-1", "project-2", "project-3"],
        ),
        clip(
            "clip-6",
            "Drone Clip",
            &["project-1", "project-3", "project-4"],
        ),
        clip(
            "clip-7",
            "Voiceover Clip",
            &["project-2", "project-4", "project-5"],
        ),
        clip("clip-8", "Soundtrack Clip", &["project-3", "project-4"]),
        clip("clip-9", "Closing Clip", &["project-4", "project-5"]),
        clip("clip-10", "Behind the Scenes Clip", &["project-5"]),
    ];

    Dataset::new(projects, clips)
}
