//! Static site content: organization profile, navigation, team, kits and videos.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Organization {
    pub name: &'static str,
    pub tagline: &'static str,
    pub mission: &'static str,
    pub pitch: &'static str,
    pub contact_email: &'static str,
    pub tone: &'static str,
    pub goal: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TeamMember {
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Kit {
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Video {
    pub id: &'static str,
    pub title: &'static str,
    pub thumbnail: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentCatalog {
    pub organization: Organization,
    pub nav_links: Vec<NavLink>,
    pub team: Vec<TeamMember>,
    pub kits: Vec<Kit>,
    pub videos: Vec<Video>,
}

impl ContentCatalog {
    pub fn video(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|video| video.id == id)
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        stem_out()
    }
}

pub const CHAT_GREETING: &str = "Hi there! How can I help you learn about STEM Out today?";

pub fn stem_out() -> ContentCatalog {
    ContentCatalog {
        organization: Organization {
            name: "STEM Out",
            tagline: "Let's rediscover the world through science",
            mission: "STEM Out works to help underprivileged populations explore their surroundings from a science-oriented perspective through tailored STEM kits, fostering inclusivity, curiosity and inspiring the next generation of innovation.",
            pitch: "Fostering inclusivity and curiosity for underprivileged populations through tailored, hands-on STEM kits.",
            contact_email: "stemout.co@gmail.com",
            tone: "Be encouraging, positive, and concise. Keep answers simple and easy to understand for a general audience that may include students, teachers, and potential donors.",
            goal: "Your main goal is to answer questions about STEM Out's mission, events, and how to get involved. If you don't know an answer, say so politely and direct them to the contact email.",
        },
        nav_links: vec![
            NavLink { href: "#home", label: "Home" },
            NavLink { href: "#about", label: "About Us" },
            NavLink { href: "#team", label: "Meet the Team" },
            NavLink { href: "#events", label: "Our Kits" },
            NavLink { href: "#analytics", label: "Our Impact" },
            NavLink { href: "#contact", label: "Contact" },
        ],
        team: vec![
            TeamMember {
                name: "Ada Yao",
                description: "Hi everyone! My name is Ada Yao, I'm a grade 11 student at the University of Toronto Schools. I'm passionate about biology and biomedical engineering but you can also find me fencing and playing with my cat!",
                image: "https://images.unsplash.com/photo-1596799321459-22a108938229?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1770&q=80",
            },
            TeamMember {
                name: "Jessica Lang",
                description: "Hey everyone! My name is Jessica Lang and I'm a grade 11 student at University of Toronto Schools. I'm passionate about software engineering and physics. I also love playing basketball and listening to music in my free time!",
                image: "https://images.unsplash.com/photo-1598191264879-67375a64388e?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1770&q=80",
            },
        ],
        kits: vec![
            Kit {
                title: "Paper Helicopter Physics",
                description: "In this kit, we will create paper helicopters to explore how gravity and air resistance affect falling objects. The paper helicopter is made by cutting and folding a strip of paper so that it has two blades at the top, which spin as it falls. When the helicopter is dropped from a height, gravity pulls it downward, while air pushes against the blades and makes it rotate. This spinning motion slows down the fall because of air resistance, allowing the helicopter to float gently to the ground. By changing the size of the blades or the weight at the bottom, we can see how these factors influence how fast or slow the helicopter falls. This simple activity helps us understand basic physics concepts like forces, motion, and the effect of air on moving objects.",
                image: "https://images.unsplash.com/photo-1608275893132-6176595d7b5b?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1770&q=80",
            },
            Kit {
                title: "Density & Buoyancy Boats",
                description: "The aluminum foil boat and pennies experiment demonstrates the concept of density and how it affects an object’s ability to float. In the experiment, a boat is made by shaping a piece of aluminum foil into a wide, shallow container. When placed in water, the boat floats, and pennies are slowly added one by one. The goal is to see how many pennies the boat can hold before it sinks. The key scientific idea is density, which is the ratio of mass to volume. Although the pennies are dense and heavy, the foil boat has a large volume and low overall density because it traps air inside. As long as the average density of the boat and its contents is less than that of water, it will float. When too many pennies are added, the combined density increases. Once it becomes greater than the density of water, the boat sinks.",
                image: "https://images.unsplash.com/photo-1599399430859-24c73b090875?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1770&q=80",
            },
            Kit {
                title: "Nanofilm Creation",
                description: "This STEM kit offers a calming, hands-on activity that introduces students to nanoscience through sensory-friendly exploration. Using only clear nail polish, water, and paper, students create an iridescent nanofilm that shimmers with color when transferred onto the paper’s surface. As the students see the nail polish form a film on the paper, they can learn about surface tension, light reflection and interference, and the impact of nano-thin materials that are different from bulk materials. This experiment allows students to observe a scientific phenomenon in an aesthetic, engaging way.",
                image: "https://images.unsplash.com/photo-1506791244131-c39a3ce4e235?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1770&q=80",
            },
            Kit {
                title: "Fruit DNA Extraction",
                description: "This DNA extraction STEM kit uses safe, familiar materials (dish soap, salt, and cold rubbing alcohol) to help students extract real DNA from fruits like strawberries or bananas. First, students will mash the fruit in a resealable bag, physically breaking down cell walls. Then, they mix in salt and dish soap: the salt helps the DNA clump together, and the soap breaks open cell and nuclear membranes, releasing the DNA into solution. Next, students slowly add cold alcohol, which causes the DNA to precipitate and rise as white, stringy clouds. Students learn key biological concepts such as cell structure, molecular composition, and the universality of DNA in living things.",
                image: "https://images.unsplash.com/photo-1588257077884-42f067645d10?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1770&q=80",
            },
        ],
        videos: vec![
            Video {
                id: "1",
                title: "How to Build a Lemon Battery!",
                thumbnail: "https://img.youtube.com/vi/G3_0556S-qg/hqdefault.jpg",
            },
            Video {
                id: "2",
                title: "Exploring the Wonders of Surface Tension",
                thumbnail: "https://img.youtube.com/vi/Ua_U6-d_A2I/hqdefault.jpg",
            },
            Video {
                id: "3",
                title: "DIY Bottle Rocket: A Guide to Newton's Laws",
                thumbnail: "https://img.youtube.com/vi/H-Z6j_mWm9E/hqdefault.jpg",
            },
        ],
    }
}
