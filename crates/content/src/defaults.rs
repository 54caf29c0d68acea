// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Built-in content shown when the remote document cannot be loaded.

use crate::document::{
    About, Contact, ContentDocument, Gallery, GalleryImage, Hero, Navbar, ServiceItem, Services,
};

const SERVICES: &[(&str, &str)] = &[
    ("Grading", "Professional land grading and site preparation services"),
    ("Paving", "High-quality asphalt and concrete paving solutions"),
    ("Concrete Work", "Expert concrete installation and finishing"),
    ("Water & Sewer", "Complete water and sewer line installation and repair"),
    ("Storm Drain", "Storm drainage system design and installation"),
    ("Utility Installation", "Professional utility service installation"),
];

const GALLERY: &[(&str, &str)] = &[
    (
        "https://images.unsplash.com/photo-1590496793907-892f56b5d9af?w=600&q=80",
        "Road Construction",
    ),
    (
        "https://images.unsplash.com/photo-1581094794329-c8112a89af12?w=600&q=80",
        "Site Preparation",
    ),
    (
        "https://images.unsplash.com/photo-1597476470008-bd530f940c45?w=600&q=80",
        "Heavy Equipment",
    ),
    (
        "https://images.unsplash.com/photo-1504917595217-d4dc5ebe6122?w=600&q=80",
        "Construction Site",
    ),
    (
        "https://images.unsplash.com/photo-1621875688671-0d3c47f68c23?w=600&q=80",
        "Excavation Work",
    ),
    (
        "https://images.unsplash.com/photo-1589939705384-5185137a7f0f?w=600&q=80",
        "Utility Installation",
    ),
];

const COMPANY: &str = "Simmons Civil Group Inc";
const PHONE: &str = "(910) 782-8325";

impl ContentDocument {
    /// The hardcoded document used when loading fails.
    #[must_use]
    pub fn fallback() -> Self {
        ContentDocument {
            hero: Hero {
                title: format!("Welcome to {COMPANY}"),
                subtitle: "Quality Construction Services You Can Trust".to_string(),
                background_image:
                    "https://images.unsplash.com/photo-1504917595217-d4dc5ebe6122?w=1920&q=80"
                        .to_string(),
            },
            about: About {
                title: "About Us".to_string(),
                subtitle: "25+ Years of Excellence".to_string(),
                text1: format!(
                    "{COMPANY} has been providing top-quality construction and utility services \
                     for over 25 years. Our commitment to excellence, safety, and client \
                     satisfaction sets us apart in the industry."
                ),
                text2: "We pride ourselves on building lasting relationships with our clients \
                        through reliable service, quality workmanship, and attention to detail \
                        on every project."
                    .to_string(),
                image: "https://images.unsplash.com/photo-1581094794329-c8112a89af12?w=800&q=80"
                    .to_string(),
            },
            services: Services {
                title: "Our Services".to_string(),
                items: (1..)
                    .zip(SERVICES)
                    .map(|(id, (title, description))| ServiceItem {
                        id,
                        title: (*title).to_string(),
                        description: (*description).to_string(),
                    })
                    .collect(),
            },
            gallery: Gallery {
                title: "Our Projects".to_string(),
                subtitle: "Take a look at some of our recent work".to_string(),
                images: (1..)
                    .zip(GALLERY)
                    .map(|(id, (url, caption))| GalleryImage {
                        id,
                        url: (*url).to_string(),
                        caption: (*caption).to_string(),
                    })
                    .collect(),
            },
            contact: Contact {
                title: "Contact Us".to_string(),
                subtitle: "Get In Touch".to_string(),
                address: "123 Main Street\nYour City, ST 12345".to_string(),
                phone: PHONE.to_string(),
                hours: "Monday - Friday: 8:00 AM - 5:00 PM".to_string(),
            },
            navbar: Navbar {
                company_name: COMPANY.to_string(),
                phone: PHONE.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_lists_are_numbered_from_one() {
        let doc = ContentDocument::fallback();
        let service_ids: Vec<u64> = doc.services.items.iter().map(|s| s.id).collect();
        assert_eq!(service_ids, vec![1, 2, 3, 4, 5, 6]);
        let image_ids: Vec<u64> = doc.gallery.images.iter().map(|i| i.id).collect();
        assert_eq!(image_ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(doc.navbar.company_name, COMPANY);
    }
}
