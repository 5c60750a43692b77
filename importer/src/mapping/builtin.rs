//! Built-in plan for the site's CSV exports.
//!
//! Authors come first so blog posts can connect to them. Media upload
//! fields are skipped; they have to be attached by hand in the admin panel.

use super::directive::{FileImport, ImportPlan, MappingSpec};
use super::transform::Transform;

pub fn builtin_plan() -> ImportPlan {
    ImportPlan::new(vec![
        FileImport::new(
            "Authors.csv",
            MappingSpec::new("authors")
                .rename("Slug", "slug")
                .rename("Title", "title")
                .skip("Image")
                .rename("Content", "content"),
        ),
        FileImport::new(
            "EVCA Team.csv",
            MappingSpec::new("evca-teams")
                .rename("Slug", "slug")
                .rename("Name", "name")
                .skip("Headshot")
                .rename("Chapter", "chapter")
                .rename("X", "x")
                .rename("LinkedIn", "linkedin")
                .rename("Firm URL", "firm_url")
                .rename("Logo URL", "logo_url")
                .skip("Logo")
                .rename("Type", "type")
                .rename("Firm", "firm")
                .rename("Bio", "bio"),
        ),
        FileImport::new(
            "Chapter Images.csv",
            MappingSpec::new("chapter-images")
                .rename("Slug", "slug")
                .rename("Title", "title")
                .skip("Image")
                .rename("Type", "type")
                .rename("Content", "content"),
        ),
        FileImport::new(
            "Thesis Briefs.csv",
            MappingSpec::new("thesis-briefs")
                .rename("Slug", "slug")
                .rename("Title", "title")
                .rename("Cover Image URL", "cover_image_url")
                .rename("Investor headshot URL", "investor_headshot_url")
                .rename("Publish Date", "publish_date")
                .rename("Type", "type")
                .rename("Investor Name", "investor_name")
                .rename("Firm", "firm")
                .rename("Host URL", "host_url")
                .rename("Featured #", "featured")
                .rename("Content", "content"),
        ),
        FileImport::new(
            "Blog.csv",
            MappingSpec::new("blogs")
                .rename("Slug", "slug")
                .rename("Title", "title")
                .rename("Date", "date")
                // Header is misspelled in the export.
                .rename("Categry", "category")
                .rename("Tag", "tag")
                .skip("Thumbnail")
                .transform("Featured", "featured", Transform::Boolean)
                .transform("Author", "author", Transform::relation("authors"))
                .rename("Blurb", "blurb")
                .rename("Content", "content"),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldDirective;

    #[test]
    fn test_builtin_plan_is_valid() {
        assert!(builtin_plan().validate().is_ok());
    }

    #[test]
    fn test_authors_before_blog() {
        let plan = builtin_plan();
        let files: Vec<&str> = plan.files.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(
            files,
            vec!["Authors.csv", "EVCA Team.csv", "Chapter Images.csv", "Thesis Briefs.csv", "Blog.csv"]
        );
    }

    #[test]
    fn test_blog_directives() {
        let plan = builtin_plan();
        let blog = &plan.get("Blog.csv").unwrap().spec;

        assert_eq!(blog.content_type, "blogs");
        assert_eq!(
            blog.directive("Categry"),
            Some(&FieldDirective::Rename {
                field: "category".into()
            })
        );
        assert!(blog.directive("Category").is_none());
        assert_eq!(blog.directive("Thumbnail"), Some(&FieldDirective::Skip));
        assert!(matches!(
            blog.directive("Author"),
            Some(FieldDirective::Transform { transform: Transform::Relation { .. }, .. })
        ));
    }

    #[test]
    fn test_builtin_plan_survives_json() {
        let plan = builtin_plan();
        let json = plan.to_json().unwrap();
        assert_eq!(ImportPlan::from_json(&json).unwrap(), plan);
    }
}
