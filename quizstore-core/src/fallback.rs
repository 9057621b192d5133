//! Built-in quiz and catalog content
//!
//! Consulted only when the store has no matching row or cannot be read.
//! Never merged with live rows.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::models::{Question, QuestionOption, Specialization, UniversityCard};

/// Option values in presentation order, paired with their category tag
pub const OPTION_SCALE: [(i64, &str); 4] = [(4, "code"), (8, "data"), (12, "design"), (16, "security")];

/// (question category, question text, option texts in scale order)
const QUESTION_TABLE: [(&str, &str, [&str; 4]); 30] = [
    ("technical", "Как вы реагируете на новый гаджет/программу?", [
        "Хочу разобрать/изучить его код",
        "Изучаю документацию и тех. характеристики",
        "Оцениваю дизайн и удобство интерфейса",
        "Проверяю настройки безопасности",
    ]),
    ("technical", "Ваш подход к решению технических проблем?", [
        "Пишу алгоритм решения",
        "Собираю статистику ошибок",
        "Ищу красивое элегантное решение",
        "Анализирую возможные угрозы",
    ]),
    ("technical", "Какой проект вас больше увлечет?", [
        "Оптимизация кода",
        "Прогнозирование трендов",
        "Создание логотипа",
        "Тестирование защиты системы",
    ]),
    ("technical", "Ваше отношение к математике?", [
        "Нужна для алгоритмов",
        "Основа анализа данных",
        "Полезна для графики",
        "Важна для криптографии",
    ]),
    ("technical", "Какой язык вам интереснее?", [
        "Python/Java",
        "SQL/R",
        "HTML/CSS",
        "Assembly",
    ]),
    ("technical", "Какой софт вам ближе?", [
        "IDE (VSCode)",
        "Аналитические инструменты (Tableau)",
        "Графические редакторы (Figma)",
        "Сканеры уязвимостей",
    ]),
    ("technical", "Какой хобби-проект выберете?", [
        "Сайт-портфолио",
        "Анализ своих привычек",
        "Дизайн постера",
        "Шифрование дневника",
    ]),
    ("technical", "Ваш стиль работы:", [
        "Системный и структурированный",
        "Аналитический и точный",
        "Креативный и гибкий",
        "Осторожный и методичный",
    ]),
    ("technical", "Что важнее в проекте?", [
        "Эффективность кода",
        "Достоверность данных",
        "Визуальная привлекательность",
        "Защищенность системы",
    ]),
    ("technical", "Какой курс выберете?", [
        "Алгоритмы",
        "Машинное обучение",
        "Веб-дизайн",
        "Криптография",
    ]),
    ("work_pref", "Какой график работы вам подходит?", [
        "Гибкий (удалёнка, свободные часы)",
        "Чёткий (с плановыми отчётами)",
        "Нестандартный (креативные спринты)",
        "Регламентированный (с соблюдением протоколов)",
    ]),
    ("work_pref", "Какой тип команды вам комфортен?", [
        "Технические специалисты",
        "Аналитики и учёные",
        "Дизайнеры и копирайтеры",
        "Специалисты по compliance",
    ]),
    ("work_pref", "Какой проект вас вдохновит?", [
        "Разработка движка для соцсети",
        "Прогнозирование биржевых трендов",
        "Создание айдентики бренда",
        "Аудит банковской системы",
    ]),
    ("work_pref", "Как вы относитесь к рутинным задачам?", [
        "Автоматизирую",
        "Анализирую на улучшения",
        "Делаю их эстетичными",
        "Проверяю на риски",
    ]),
    ("work_pref", "Что для вас важно в работе?", [
        "Сложные технические вызовы",
        "Точность и достоверность",
        "Визуальная гармония",
        "Надёжность и защищённость",
    ]),
    ("work_pref", "Какой формат обучения предпочитаете?", [
        "Хакатоны и практика",
        "Исследования и статистика",
        "Воркшопы по креативу",
        "Кейсы по кибербезопасности",
    ]),
    ("work_pref", "Какой офис вам подойдёт?", [
        "Коворкинг с IT-стартапами",
        "Лаборатория данных",
        "Студия с арт-пространством",
        "Офис с защищённой инфраструктурой",
    ]),
    ("work_pref", "Как вы принимаете решения?", [
        "На основе логики",
        "На основе данных",
        "Интуитивно-образно",
        "Через оценку рисков",
    ]),
    ("work_pref", "Какой журнал вы купите?", [
        "Хакер",
        "Harvard Business Review",
        "Как (о дизайне)",
        "Information Security",
    ]),
    ("work_pref", "Ваш подход к ошибкам?", [
        "Разбираю баги",
        "Ищу закономерности",
        "Превращаю в фичу",
        "Устраняю уязвимости",
    ]),
    ("personal", "Как вас описывают друзья?", [
        "Технарь",
        "Аналитик",
        "Творческий",
        "Бдительный",
    ]),
    ("personal", "Ваша суперсила?", [
        "Решение сложных задач",
        "Нахождение закономерностей",
        "Генерирование идей",
        "Предвидение рисков",
    ]),
    ("personal", "Какой фильм вам ближе?", [
        "Социальная сеть",
        "Игра на понижение",
        "Отель Гранд Будапешт",
        "Война миров Z",
    ]),
    ("personal", "Ваш стиль мышления?", [
        "Алгоритмический",
        "Системный",
        "Ассоциативный",
        "Осторожный",
    ]),
    ("personal", "Что вас раздражает?", [
        "Неоптимальный код",
        "Неточные данные",
        "Безвкусица",
        "Беспечность",
    ]),
    ("personal", "Как отдыхаете?", [
        "Участвую в CTF-соревнованиях",
        "Анализирую свои привычки",
        "Посещаю выставки",
        "Изучаю схемы защиты",
    ]),
    ("personal", "Ваш девиз?", [
        "Move fast and break things",
        "Data never lies",
        "Design is intelligence made visible",
        "Security first",
    ]),
    ("personal", "Какой гаджет купите?", [
        "Raspberry Pi",
        "Графический планшет",
        "Wacom Cintiq",
        "YubiKey",
    ]),
    ("personal", "Как учитесь новому?", [
        "Через практику",
        "Через исследования",
        "Через вдохновение",
        "Через стандарты",
    ]),
    ("personal", "Ваша цель в IT?", [
        "Создать технологичный продукт",
        "Найти инсайты в данных",
        "Делать цифровую среду красивее",
        "Защитить информацию",
    ]),
];

/// (name, description, skills, careers)
const SPECIALIZATION_TABLE: [(&str, &str, &str, &str); 8] = [
    (
        "Программная инженерия",
        "Разработка и сопровождение программного обеспечения. Создание эффективных алгоритмов, архитектуры систем и оптимизация производительности.",
        "• Программирование (Python, Java, C++)\n• Алгоритмы и структуры данных\n• Архитектура ПО\n• DevOps практики\n• Работа с базами данных",
        "• Backend-разработчик\n• DevOps-инженер\n• Архитектор ПО\n• Team Lead",
    ),
    (
        "Data Science",
        "Анализ больших данных, машинное обучение и извлечение инсайтов для принятия бизнес-решений.",
        "• Статистика и математика\n• Машинное обучение\n• Python/R/SQL\n• Визуализация данных\n• Big Data технологии",
        "• Специалист по обработке данных\n• Аналитик данных\n• ML-инженер\n• Специалист по бизнес-аналитике",
    ),
    (
        "UX/UI дизайн",
        "Создание удобных и красивых пользовательских интерфейсов. Исследование пользовательского опыта и проектирование взаимодействий.",
        "• Figma, Sketch, Adobe XD\n• Принципы UX/UI\n• Прототипирование\n• Аналитика поведения\n• Типографика и цветоведение",
        "• UX-дизайнер\n• UI-дизайнер\n• Продуктовый дизайнер\n• UX-исследователь",
    ),
    (
        "Кибербезопасность",
        "Защита информационных систем от киберугроз. Анализ уязвимостей и разработка защитных механизмов.",
        "• Сетевые протоколы\n• Криптография\n• Penetration Testing\n• Forensics\n• Compliance и аудит",
        "• Инженер по безопасности\n• Пентестер\n• Аналитик безопасности\n• CISO",
    ),
    (
        "DevOps инженерия",
        "Автоматизация процессов разработки и развертывания. Управление инфраструктурой и обеспечение непрерывной интеграции.",
        "• Docker, Kubernetes\n• CI/CD (Jenkins, GitLab)\n• Облачные платформы (AWS, Azure)\n• Мониторинг и логирование\n• Linux и скриптинг",
        "• DevOps-инженер\n• SRE-инженер\n• Облачный инженер\n• Платформенный инженер",
    ),
    (
        "Мобильная разработка",
        "Создание приложений для iOS и Android. Разработка нативных и кроссплатформенных решений.",
        "• Swift/Objective-C (iOS)\n• Kotlin/Java (Android)\n• React Native/Flutter\n• UI/UX для мобильных\n• App Store оптимизация",
        "• iOS-разработчик\n• Android-разработчик\n• Мобильный разработчик\n• React Native-разработчик",
    ),
    (
        "Game Development",
        "Разработка игр для различных платформ. Создание игровых механик, графики и пользовательского опыта.",
        "• Unity/Unreal Engine\n• C#/C++\n• 3D моделирование\n• Игровая физика\n• Звуковой дизайн",
        "• Игровой разработчик\n• Unity-разработчик\n• Гейм-дизайнер\n• Технический художник",
    ),
    (
        "AI/ML инженерия",
        "Разработка систем искусственного интеллекта и машинного обучения. Создание алгоритмов для решения сложных задач.",
        "• Deep Learning (PyTorch, TensorFlow)\n• Computer Vision\n• NLP\n• MLOps\n• Математическая оптимизация",
        "• ML-инженер\n• Исследователь ИИ\n• Инженер компьютерного зрения\n• NLP-инженер",
    ),
];

static QUESTIONS: Lazy<BTreeMap<i64, Question>> = Lazy::new(|| {
    QUESTION_TABLE
        .iter()
        .zip(1..)
        .map(|((category, text, labels), id)| {
            let options = labels
                .iter()
                .zip(OPTION_SCALE)
                .map(|(label, (value, tag))| QuestionOption {
                    text: (*label).to_string(),
                    value,
                    category: tag.to_string(),
                })
                .collect();
            (
                id,
                Question {
                    id,
                    text: (*text).to_string(),
                    category: (*category).to_string(),
                    options,
                },
            )
        })
        .collect()
});

static SPECIALIZATIONS: Lazy<Vec<Specialization>> = Lazy::new(|| {
    SPECIALIZATION_TABLE
        .iter()
        .zip(1..)
        .map(|((name, description, skills, careers), id)| Specialization {
            id,
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            tech_score: None,
            analytic_score: None,
            creative_score: None,
            careers: Some((*careers).to_string()),
            skills: Some((*skills).to_string()),
        })
        .collect()
});

/// All built-in questions keyed by id (1..=30)
pub fn questions() -> &'static BTreeMap<i64, Question> {
    &QUESTIONS
}

/// Built-in question by id
pub fn question(id: i64) -> Option<Question> {
    QUESTIONS.get(&id).cloned()
}

/// Built-in specialization catalog in its fixed order
pub fn specializations() -> &'static [Specialization] {
    &SPECIALIZATIONS
}

/// Built-in specialization by exact name
pub fn specialization(name: &str) -> Option<Specialization> {
    SPECIALIZATIONS.iter().find(|s| s.name == name).cloned()
}

/// Sample universities returned when the per-specialization lookup fails
pub fn sample_universities() -> Vec<UniversityCard> {
    [
        (1, "МГУ им. М.В. Ломоносова", "Москва", 85.0, 100.0, "https://www.msu.ru"),
        (2, "СПбГУ", "Санкт-Петербург", 80.0, 95.0, "https://spbu.ru"),
        (3, "МФТИ", "Москва", 90.0, 100.0, "https://mipt.ru"),
        (4, "ИТМО", "Санкт-Петербург", 85.0, 98.0, "https://itmo.ru"),
    ]
    .into_iter()
    .map(|(id, name, city, min, max, url)| UniversityCard {
        id,
        name: name.to_string(),
        city: city.to_string(),
        score_min: Some(min),
        score_max: Some(max),
        url: Some(url.to_string()),
        location: Some(city.to_string()),
    })
    .collect()
}
