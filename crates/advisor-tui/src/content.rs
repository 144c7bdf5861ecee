//! Landing page copy

pub const TITLE: &str = "MyAdvisor";

pub const TAGLINE: &str =
    "24/7 AI powered academic and course planning support for UW students";

pub const CALL_TO_ACTION: &str = "Let's get started";

pub const ABOUT_HEADING: &str = "854 Degrees. 180 Majors. 50,000 Students. One Tool.";

pub const ABOUT: [&str; 2] = [
    "MyPlan AI Advisor is your 24/7 academic planning companion. Our AI-powered platform helps \
     UW students navigate over 854 degree programs and 180 majors to plan and prepare for their \
     educational journey.",
    "Get personalized course recommendations, explore majors that match your interests, and \
     create a clear path to graduation. Whether you're choosing a major or planning next \
     semester's schedule, MyPlan AI Advisor provides instant, intelligent guidance whenever you need it.",
];

pub const FAQS: [(&str, &str); 4] = [
    (
        "Who can use myAdvisor?",
        "Any UW student can use this tool to plan their academic journey. It's a great resource for \
         students who are unsure about their major or want to explore different options.",
    ),
    (
        "Does MyAdvisor cost money or need a subscription?",
        "Yes! This tool is free to use and will always be free. You can use it as many times as you want.",
    ),
    (
        "How does myAdvisor help UW students?",
        "This tool uses AI to help you plan your academic journey. You can ask it questions about your \
         interests, skills, and career goals, and it will help you find the best major for you.",
    ),
    (
        "Are the recommendations accurate?",
        "Yes! This tool is accurate and up-to-date. It's a great resource for students who are unsure \
         about their major or want to explore different options.",
    ),
];

pub const USER_NAME: &str = "User";

pub const INPUT_PLACEHOLDER: &str = "How can I help you today?";
