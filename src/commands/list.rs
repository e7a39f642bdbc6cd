//! List known articles

use anyhow::Result;

use crate::article::ArticleSummary;
use crate::Site;

/// Print every article the site pre-renders
pub fn run(site: &Site) -> Result<()> {
    let articles = site.workflow()?.list_articles()?;

    println!("Articles ({}):", articles.len());
    for line in format_lines(&articles) {
        println!("{}", line);
    }

    Ok(())
}

fn format_lines(articles: &[ArticleSummary]) -> Vec<String> {
    articles
        .iter()
        .map(|a| {
            let marker = if a.is_future { " [upcoming]" } else { "" };
            format!("  {} - {} [{}]{}", a.formatted_date, a.title, a.slug, marker)
        })
        .collect()
}
